//! Layout Module - text measurement and the wrapping flow engine.
//!
//! Everything is measured in terminal cells. [`text_measure`] answers "how
//! wide is this string", [`flow`] answers "where does each item go" for a
//! row of fixed-size items that wrap onto new lines.
//!
//! # Example
//!
//! ```ignore
//! use spark_tags::layout::{flow_layout, FlowConfig};
//! use spark_tags::Size;
//!
//! let sizes = [Size::new(40, 1), Size::new(60, 1), Size::new(50, 1)];
//! let config = FlowConfig { container_width: 120, space_between_tags: 10, ..FlowConfig::default() };
//! let layout = flow_layout(&sizes, &config);
//! assert_eq!(layout.lines.len(), 2);
//! ```

pub mod flow;
pub mod text_measure;

pub use flow::{flow_layout, FlowConfig, FlowLayout, FlowLine};
pub use text_measure::{char_width, measure_line, string_width, truncate_text};
