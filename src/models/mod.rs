pub mod classification;
pub mod focus;
pub mod report;
pub mod technique;

pub use classification::{
    ClassificationRequest, ClassificationResult, ClassifiedElement, MalformedReason, ParsedBatch,
    RequestPart,
};
pub use focus::{ElementAttributes, ElementMetadata, ElementSignature, FocusRecord, Screenshot};
pub use report::{ComplianceReport, ReportEntry};
pub use technique::Technique;
