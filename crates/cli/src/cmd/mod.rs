mod fix;

pub use fix::cmd_fix;
