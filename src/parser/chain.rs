//! Capture-sequence chains.
//!
//! A chain frame accumulates the captures of one in-progress sequence and
//! links to the frame of the enclosing sequence. Frames are shared between
//! the branches created by a split through `Rc`, so the number of live
//! handles to a frame is its pending-fork count: appending to a frame that
//! is still shared clones it first and leaves the siblings untouched, while
//! the parent stays shared.

use super::capture::Capture;
use super::errors::RulePath;
use super::matcher::MatcherId;
use smol_str::SmolStr;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct CaptureChain<N> {
    /// Distinguishes frames of one parse; copies made on append keep it
    id: u32,
    /// The sequence being filled; `None` for the root frame
    sequence: Option<MatcherId>,
    name: Option<SmolStr>,
    arity: usize,
    captures: Vec<Capture<N>>,
    parent: Option<Rc<CaptureChain<N>>>,
}

/// What a completed frame leaves behind
pub struct Completed<N> {
    pub sequence: Option<MatcherId>,
    pub captures: Vec<Capture<N>>,
    pub parent: Option<Rc<CaptureChain<N>>>,
}

impl<N: Clone> CaptureChain<N> {
    /// The root frame: one slot, filled by the entry rule's capture
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            id: 0,
            sequence: None,
            name: None,
            arity: 1,
            captures: Vec::new(),
            parent: None,
        })
    }

    /// A new frame `id` for `sequence` inside `parent`
    pub fn push(parent: Rc<Self>, id: u32, sequence: MatcherId, name: Option<SmolStr>, arity: usize) -> Rc<Self> {
        Rc::new(Self {
            id,
            sequence: Some(sequence),
            name,
            arity,
            captures: Vec::with_capacity(arity),
            parent: Some(parent),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn sequence(&self) -> Option<MatcherId> {
        self.sequence
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn captures(&self) -> &[Capture<N>] {
        &self.captures
    }

    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.captures.len() == self.arity
    }

    /// How many branches and child frames still share this frame
    pub fn fork_count(this: &Rc<Self>) -> usize {
        Rc::strong_count(this)
    }

    /// Append the next slot's capture, cloning the frame first if it is
    /// still shared
    pub fn append(this: &mut Rc<Self>, capture: Capture<N>) {
        let frame = Rc::make_mut(this);
        debug_assert!(frame.captures.len() < frame.arity);
        frame.captures.push(capture);
    }

    /// Take the captures and parent out of a complete frame.
    ///
    /// The frame is left empty; callers replace their handle with the
    /// returned parent.
    pub fn take_completed(this: &mut Rc<Self>) -> Completed<N> {
        let frame = Rc::make_mut(this);
        Completed {
            sequence: frame.sequence,
            captures: std::mem::take(&mut frame.captures),
            parent: frame.parent.take(),
        }
    }

    /// This frame and its enclosing frames, innermost first
    pub fn frames(&self) -> impl Iterator<Item = &CaptureChain<N>> {
        std::iter::successors(Some(self), |frame| frame.parent.as_deref())
    }

    /// Names of the named frames from this one outwards
    pub fn breadcrumb(&self) -> RulePath {
        self.frames()
            .filter_map(|frame| frame.name.clone().filter(|n| !n.is_empty()))
            .collect()
    }
}
