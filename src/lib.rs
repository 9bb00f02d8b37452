//! Virtualized, grouped select lists and anchored popovers for ratatui.

pub mod config;
pub mod options;
pub mod popover;
pub mod theme;
pub mod virtual_list;
