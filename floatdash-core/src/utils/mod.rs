pub mod fsio;
pub mod logbook;
