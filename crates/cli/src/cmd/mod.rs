mod add;
mod init;
mod show;

pub use add::cmd_add;
pub use init::cmd_init;
pub use show::cmd_show;
