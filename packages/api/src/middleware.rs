pub mod error_reporting;
