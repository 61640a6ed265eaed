use winit::window::{Cursor, CursorIcon};

/// Number of logical cursor kinds.
pub const CURSOR_COUNT: usize = 4;

/// Cursor shapes the GUI layer can request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CursorKind {
    Arrow = 0,
    ResizeHorizontal = 1,
    ResizeVertical = 2,
    ResizeDiagonal = 3,
}

impl CursorKind {
    pub const ALL: [CursorKind; CURSOR_COUNT] = [
        CursorKind::Arrow,
        CursorKind::ResizeHorizontal,
        CursorKind::ResizeVertical,
        CursorKind::ResizeDiagonal,
    ];

    /// Native system cursor for this kind.
    pub fn icon(self) -> CursorIcon {
        match self {
            CursorKind::Arrow => CursorIcon::Default,
            CursorKind::ResizeHorizontal => CursorIcon::EwResize,
            CursorKind::ResizeVertical => CursorIcon::NsResize,
            CursorKind::ResizeDiagonal => CursorIcon::NwseResize,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// One native cursor per [`CursorKind`], created up front.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: [Cursor; CURSOR_COUNT],
}

impl CursorSet {
    pub fn new() -> Self {
        Self {
            cursors: CursorKind::ALL.map(|kind| Cursor::Icon(kind.icon())),
        }
    }

    pub fn get(&self, kind: CursorKind) -> &Cursor {
        &self.cursors[kind.index()]
    }
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}
