use std::{fmt, time::Duration};

use crate::metastore::{WindowInfo, WindowType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Tumbling { size: Duration },
    Hopping { size: Duration, advance: Duration },
    Session { gap: Duration },
}

/// The `WINDOW ...` clause of an aggregating query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowExpression {
    pub window_name: Option<String>,
    pub kind: WindowKind,
}

impl WindowExpression {
    pub fn new(kind: WindowKind) -> Self {
        Self { window_name: None, kind }
    }

    pub fn tumbling(size: Duration) -> Self {
        Self::new(WindowKind::Tumbling { size })
    }

    pub fn hopping(size: Duration, advance: Duration) -> Self {
        Self::new(WindowKind::Hopping { size, advance })
    }

    pub fn session(gap: Duration) -> Self {
        Self::new(WindowKind::Session { gap })
    }

    /// Window carried by the keys this clause produces.
    pub fn window_info(&self) -> WindowInfo {
        match self.kind {
            WindowKind::Tumbling { size } => WindowInfo::new(WindowType::Tumbling, Some(size)),
            WindowKind::Hopping { size, .. } => WindowInfo::new(WindowType::Hopping, Some(size)),
            WindowKind::Session { .. } => WindowInfo::new(WindowType::Session, None),
        }
    }
}

impl fmt::Display for WindowExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.window_name {
            write!(f, "{} ", name)?;
        }
        match self.kind {
            WindowKind::Tumbling { size } => write!(f, "TUMBLING (SIZE {} MILLISECONDS)", size.as_millis()),
            WindowKind::Hopping { size, advance } => write!(
                f,
                "HOPPING (SIZE {} MILLISECONDS, ADVANCE BY {} MILLISECONDS)",
                size.as_millis(),
                advance.as_millis()
            ),
            WindowKind::Session { gap } => write!(f, "SESSION ({} MILLISECONDS)", gap.as_millis()),
        }
    }
}

/// The `WITHIN` bound of a stream-stream join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WithinExpression {
    pub before: Duration,
    pub after: Duration,
}

impl WithinExpression {
    pub fn new(before: Duration, after: Duration) -> Self {
        Self { before, after }
    }

    pub fn symmetric(size: Duration) -> Self {
        Self { before: size, after: size }
    }
}

impl fmt::Display for WithinExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.before == self.after {
            write!(f, "WITHIN {} MILLISECONDS", self.before.as_millis())
        } else {
            write!(f, "WITHIN ({} MILLISECONDS, {} MILLISECONDS)", self.before.as_millis(), self.after.as_millis())
        }
    }
}
