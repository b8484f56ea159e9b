//! Rule-path breadcrumbs
//!
//! A breadcrumb lists the named rules a failure happened inside, innermost
//! first. Before failures are reported their breadcrumbs are simplified
//! together so that messages show only the context that tells them apart.

use smol_str::SmolStr;
use std::fmt;

/// Names of the enclosing named rules, innermost first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RulePath {
    frames: Vec<SmolStr>,
}

impl RulePath {
    pub fn new(frames: Vec<SmolStr>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[SmolStr] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render outermost first, joined with `.`
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for (i, frame) in self.frames.iter().rev().enumerate() {
            if i > 0 {
                rendered.push('.');
            }
            rendered.push_str(frame);
        }
        rendered
    }

    /// `[x, x, y]` becomes `[x*, y]`
    fn collapse_repeats(&mut self) {
        let mut i = self.frames.len();
        while i > 1 {
            i -= 1;
            let inner = self.frames[i - 1].clone();
            let starred = format!("{}*", inner);
            if self.frames[i] == inner || self.frames[i] == starred {
                self.frames.remove(i);
                self.frames[i - 1] = SmolStr::from(starred);
            }
        }
    }

    /// Keep the three innermost frames, marking the cut on the third
    fn truncate(&mut self) {
        if self.frames.len() > 3 {
            self.frames.truncate(3);
            self.frames[2] = SmolStr::from(format!("...{}", self.frames[2]));
        }
    }
}

impl fmt::Display for RulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<S: Into<SmolStr>> FromIterator<S> for RulePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Simplify a set of breadcrumbs in place.
///
/// 1. While every path has more than one frame and all share the same
///    outermost frame, that frame is dropped from all of them.
/// 2. Adjacent repeats left by recursive rules collapse into `name*`.
/// 3. Paths longer than three frames keep their three innermost frames,
///    the third prefixed with `...`.
///
/// Empty and singleton sets pass through step 1 unchanged.
pub fn simplify(paths: &mut [RulePath]) {
    if paths.len() > 1 {
        while let Some(outermost) = shared_outermost(paths) {
            tracing::trace!("[FAILURE] stripping shared frame {}", outermost);
            for path in paths.iter_mut() {
                path.frames.pop();
            }
        }
    }

    for path in paths.iter_mut() {
        path.collapse_repeats();
        path.truncate();
    }
}

fn shared_outermost(paths: &[RulePath]) -> Option<SmolStr> {
    let first = paths.first()?.frames.last()?.clone();
    let shared = paths
        .iter()
        .all(|p| p.len() > 1 && p.frames.last() == Some(&first));
    shared.then_some(first)
}
