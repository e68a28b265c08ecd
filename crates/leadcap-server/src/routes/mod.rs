pub mod campaigns;
pub mod export;
pub mod health;
pub mod leads;
pub mod sheets;
