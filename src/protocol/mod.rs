mod mlsd;
mod mode;

pub use self::{
    mlsd::{parse_line, parse_time},
    mode::{get_ftp_mode, TransferMode},
};
