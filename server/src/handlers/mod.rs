pub mod geo_handlers;
