//! Fullscreen viewer state machine: `Grid` <-> `Fullscreen { index }`

/// Horizontal travel (px) a touch must exceed to count as a swipe
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    Fullscreen { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

/// Raw navigation input from the viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavInput {
    Key(Key),
    Swipe { start_x: f32, end_x: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Prev,
    Next,
    Close,
}

impl NavInput {
    /// Keyboard arrows and swipes map onto the same commands.
    /// Swiping right goes back, swiping left goes forward.
    pub fn command(self) -> Option<NavCommand> {
        match self {
            NavInput::Key(Key::ArrowLeft) => Some(NavCommand::Prev),
            NavInput::Key(Key::ArrowRight) => Some(NavCommand::Next),
            NavInput::Key(Key::Escape) => Some(NavCommand::Close),
            NavInput::Key(Key::Other) => None,
            NavInput::Swipe { start_x, end_x } => {
                let distance = end_x - start_x;
                if distance.abs() <= SWIPE_MIN_DISTANCE {
                    None
                } else if distance > 0.0 {
                    Some(NavCommand::Prev)
                } else {
                    Some(NavCommand::Next)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    mode: ViewMode,
    count: usize,
}

impl Lightbox {
    pub fn new(count: usize) -> Self {
        Self {
            mode: ViewMode::Grid,
            count,
        }
    }

    /// Replace the image count and return to the grid
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.mode = ViewMode::Grid;
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn index(&self) -> Option<usize> {
        match self.mode {
            ViewMode::Grid => None,
            ViewMode::Fullscreen { index } => Some(index),
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self.mode, ViewMode::Fullscreen { .. })
    }

    /// No-op without images; the index is clamped to the last image.
    pub fn open(&mut self, index: usize) {
        if self.count == 0 {
            return;
        }
        self.mode = ViewMode::Fullscreen {
            index: index.min(self.count - 1),
        };
    }

    pub fn close(&mut self) {
        self.mode = ViewMode::Grid;
    }

    pub fn next(&mut self) {
        if let ViewMode::Fullscreen { index } = self.mode {
            self.mode = ViewMode::Fullscreen {
                index: (index + 1) % self.count,
            };
        }
    }

    pub fn prev(&mut self) {
        if let ViewMode::Fullscreen { index } = self.mode {
            self.mode = ViewMode::Fullscreen {
                index: (index + self.count - 1) % self.count,
            };
        }
    }

    /// Thumbnail strip: only while fullscreen, out-of-range is ignored
    pub fn jump_to(&mut self, index: usize) {
        if self.is_fullscreen() && index < self.count {
            self.mode = ViewMode::Fullscreen { index };
        }
    }

    /// Apply a key press or swipe. Input is ignored in grid mode.
    pub fn handle(&mut self, input: NavInput) {
        if !self.is_fullscreen() {
            return;
        }
        match input.command() {
            Some(NavCommand::Prev) => self.prev(),
            Some(NavCommand::Next) => self.next(),
            Some(NavCommand::Close) => self.close(),
            None => {}
        }
    }
}
