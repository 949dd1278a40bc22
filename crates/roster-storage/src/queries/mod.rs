pub mod roster_ops;
