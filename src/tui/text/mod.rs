//! Text utilities: markup segmentation and wrapping for the chat display.

mod markup;
mod segments;
mod wrap;

pub(crate) use markup::{MarkupNode, parse_bold_markup, parse_markup};
pub(crate) use segments::{MessageSegment, split_segments};
pub(crate) use wrap::{wrap_message, wrap_spans};

#[cfg(test)]
pub(crate) use markup::{MarkupKind, scan_markup};

#[cfg(test)]
mod tests;
