//! Roster item CRUD against `roster_items`.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use roster_core::errors::{DatastoreError, DatastoreResult};
use roster_core::models::{EntryFilter, RosterItem, Subscription};
use roster_core::Jid;

use crate::to_storage_err;

const ITEM_COLUMNS: &str =
    "owner, jid, name, groups, subscription, pending_in, pending_out, whitelisted, updated_at";

/// Raw column values, decoded outside the rusqlite row callback so decoding
/// failures surface as `DatastoreError::Corrupt`.
struct ItemRow {
    owner: String,
    jid: String,
    name: Option<String>,
    groups: String,
    subscription: String,
    pending_in: bool,
    pending_out: bool,
    whitelisted: bool,
    updated_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        owner: row.get(0)?,
        jid: row.get(1)?,
        name: row.get(2)?,
        groups: row.get(3)?,
        subscription: row.get(4)?,
        pending_in: row.get(5)?,
        pending_out: row.get(6)?,
        whitelisted: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl ItemRow {
    fn corrupt(&self, details: impl Into<String>) -> DatastoreError {
        DatastoreError::Corrupt {
            owner: self.owner.clone(),
            contact: self.jid.clone(),
            details: details.into(),
        }
    }

    fn into_item(self) -> DatastoreResult<RosterItem> {
        let jid = Jid::parse(&self.jid).map_err(|e| self.corrupt(e.to_string()))?;
        let groups: BTreeSet<String> =
            serde_json::from_str(&self.groups).map_err(|e| self.corrupt(e.to_string()))?;
        let subscription = Subscription::parse(&self.subscription)
            .ok_or_else(|| self.corrupt(format!("unknown subscription {:?}", self.subscription)))?;
        let updated_at = DateTime::parse_from_rfc3339(&self.updated_at)
            .map_err(|e| self.corrupt(e.to_string()))?
            .with_timezone(&Utc);
        Ok(RosterItem {
            jid,
            name: self.name,
            groups,
            subscription,
            pending_in: self.pending_in,
            pending_out: self.pending_out,
            whitelisted: self.whitelisted,
            updated_at,
        })
    }
}

fn query_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> DatastoreResult<Vec<ItemRow>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn parse_jid(raw: &str) -> DatastoreResult<Jid> {
    Jid::parse(raw).map_err(|e| DatastoreError::Corrupt {
        owner: raw.to_string(),
        contact: String::new(),
        details: e.to_string(),
    })
}

/// Owners having at least one item matching `filter`.
pub fn list_owners(conn: &Connection, filter: &EntryFilter) -> DatastoreResult<Vec<Jid>> {
    if filter.is_empty() {
        let mut stmt = conn
            .prepare("SELECT DISTINCT owner FROM roster_items ORDER BY owner")
            .map_err(|e| to_storage_err(e.to_string()))?;
        let owners = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| to_storage_err(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| to_storage_err(e.to_string()))?;
        return owners.iter().map(|raw| parse_jid(raw)).collect();
    }

    let rows = query_rows(
        conn,
        &format!("SELECT {ITEM_COLUMNS} FROM roster_items ORDER BY owner"),
        [],
    )?;
    let mut seen = HashSet::new();
    let mut owners = Vec::new();
    for row in rows {
        if seen.contains(&row.owner) {
            continue;
        }
        let owner = row.owner.clone();
        if filter.matches(&row.into_item()?) {
            seen.insert(owner.clone());
            owners.push(parse_jid(&owner)?);
        }
    }
    Ok(owners)
}

/// Contacts in `owner`'s roster matching `filter`.
pub fn list_contacts(
    conn: &Connection,
    owner: &Jid,
    filter: &EntryFilter,
) -> DatastoreResult<Vec<Jid>> {
    let rows = query_rows(
        conn,
        &format!("SELECT {ITEM_COLUMNS} FROM roster_items WHERE owner = ?1 ORDER BY jid"),
        params![owner.to_string()],
    )?;
    let mut contacts = Vec::with_capacity(rows.len());
    for row in rows {
        let item = row.into_item()?;
        if filter.matches(&item) {
            contacts.push(item.jid);
        }
    }
    Ok(contacts)
}

pub fn get_item(conn: &Connection, owner: &Jid, contact: &Jid) -> DatastoreResult<Option<RosterItem>> {
    let row = conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM roster_items WHERE owner = ?1 AND jid = ?2"),
            params![owner.to_string(), contact.to_string()],
            read_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(ItemRow::into_item).transpose()
}

pub fn upsert_item(conn: &Connection, owner: &Jid, item: &RosterItem) -> DatastoreResult<()> {
    let groups = serde_json::to_string(&item.groups)?;
    conn.execute(
        &format!(
            "INSERT INTO roster_items ({ITEM_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(owner, jid) DO UPDATE SET
                name = excluded.name,
                groups = excluded.groups,
                subscription = excluded.subscription,
                pending_in = excluded.pending_in,
                pending_out = excluded.pending_out,
                whitelisted = excluded.whitelisted,
                updated_at = excluded.updated_at"
        ),
        params![
            owner.to_string(),
            item.jid.bare().to_string(),
            item.name,
            groups,
            item.subscription.as_str(),
            item.pending_in,
            item.pending_out,
            item.whitelisted,
            item.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_item(conn: &Connection, owner: &Jid, contact: &Jid) -> DatastoreResult<bool> {
    let deleted = conn
        .execute(
            "DELETE FROM roster_items WHERE owner = ?1 AND jid = ?2",
            params![owner.to_string(), contact.to_string()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(deleted > 0)
}
