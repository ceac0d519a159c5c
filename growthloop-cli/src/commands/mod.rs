pub mod serve;
pub mod worker;
