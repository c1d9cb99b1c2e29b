pub mod profile;
pub mod record;

pub use profile::MongoProfileRepository;
pub use record::MongoRecordRepository;
