use std::str::FromStr;

use crate::domain::{Error, Result};

/// What a rendered line is used for. The discriminant is the line's index in a [`BoxModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    HeaderTop = 0,
    Header = 1,
    HeaderSeparator = 2,
    Top = 3,
    Body = 4,
    BodySeparator = 5,
    Bottom = 6,
}

impl LineRole {
    pub const ALL: [LineRole; 7] = [
        LineRole::HeaderTop,
        LineRole::Header,
        LineRole::HeaderSeparator,
        LineRole::Top,
        LineRole::Body,
        LineRole::BodySeparator,
        LineRole::Bottom,
    ];

    pub fn top(has_header: bool) -> Self {
        if has_header { LineRole::HeaderTop } else { LineRole::Top }
    }

    pub fn content(row: usize, has_header: bool) -> Self {
        if row == 0 && has_header {
            LineRole::Header
        } else {
            LineRole::Body
        }
    }

    /// Line drawn after the content of `row`. The bottom border wins over the
    /// header separator, which wins over body separators.
    pub fn trailing(row: usize, nrows: usize, has_header: bool, separators: bool) -> Option<Self> {
        if row + 1 == nrows {
            Some(LineRole::Bottom)
        } else if row == 0 && has_header {
            Some(LineRole::HeaderSeparator)
        } else if separators {
            Some(LineRole::BodySeparator)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTemplate {
    pub left: char,
    pub fill: char,
    pub separator: char,
    pub right: char,
}

impl LineTemplate {
    pub const fn new(left: char, fill: char, separator: char, right: char) -> Self {
        Self {
            left,
            fill,
            separator,
            right,
        }
    }
}

impl FromStr for LineTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.chars().collect::<Vec<_>>()[..] {
            [left, fill, separator, right] => Ok(Self::new(left, fill, separator, right)),
            _ => Err(Error::InvalidTemplate(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxModel {
    lines: [LineTemplate; 7],
}

const fn t(left: char, fill: char, separator: char, right: char) -> LineTemplate {
    LineTemplate::new(left, fill, separator, right)
}

pub const HEAVY_HEADER: BoxModel = BoxModel {
    lines: [
        t('┏', '━', '┳', '┓'),
        t('┃', 'h', '┃', '┃'),
        t('┡', '━', '╇', '┩'),
        t('┌', '─', '┬', '┐'),
        t('│', 'b', '│', '│'),
        t('├', '─', '┼', '┤'),
        t('└', '─', '┴', '┘'),
    ],
};

pub const DOUBLE_HEADER: BoxModel = BoxModel {
    lines: [
        t('┌', '─', '┬', '┐'),
        t('│', 'h', '│', '│'),
        t('╞', '═', '╪', '╡'),
        t('┌', '─', '┬', '┐'),
        t('│', 'b', '│', '│'),
        t('├', '─', '┼', '┤'),
        t('└', '─', '┴', '┘'),
    ],
};

impl BoxModel {
    pub const fn new(lines: [LineTemplate; 7]) -> Self {
        Self { lines }
    }

    /// Builds a model from seven 4-glyph lines, in [`LineRole`] order.
    pub fn from_lines(lines: [&str; 7]) -> Result<Self> {
        let mut templates = [t(' ', ' ', ' ', ' '); 7];
        for (slot, line) in templates.iter_mut().zip(lines) {
            *slot = line.parse()?;
        }
        Ok(Self::new(templates))
    }

    pub fn line(&self, role: LineRole) -> &LineTemplate {
        &self.lines[role as usize]
    }
}

impl Default for BoxModel {
    fn default() -> Self {
        DOUBLE_HEADER
    }
}

impl FromStr for BoxModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "heavy" => Ok(HEAVY_HEADER),
            "double" => Ok(DOUBLE_HEADER),
            _ => Err(Error::UnknownStyle(s.to_string())),
        }
    }
}
