pub mod influx;
pub mod logger;
