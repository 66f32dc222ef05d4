//! File system access to the content tree.

pub mod layout;
pub mod reader;

pub use layout::ContentLayout;
