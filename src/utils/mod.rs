pub mod logging;
pub mod report_printer;
