use std::fmt::Display;
use yansi::{Color, Paint};

fn bold<T: Display>(color: Color, value: T) -> Paint<T> { color.style().bold().paint(value) }

/// Field names and actions.
pub(crate) fn color_label<T: Display>(value: T) -> Paint<T> { bold(Color::Green, value) }

/// Account aliases and call peers.
pub(crate) fn color_name<T: Display>(value: T) -> Paint<T> { bold(Color::Cyan, value) }

/// Ids assigned by the daemon.
pub(crate) fn color_id<T: Display>(value: T) -> Paint<T> { bold(Color::Blue, value) }

pub(crate) fn color_good<T: Display>(value: T) -> Paint<T> { bold(Color::Yellow, value) }

pub(crate) fn color_bad<T: Display>(value: T) -> Paint<T> { bold(Color::Red, value) }
