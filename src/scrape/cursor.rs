//! Column cursor shared by the row-oriented documents.
//!
//! Each document describes its row layout as a [`RowLayout`]: one
//! [`ColumnSpec`] per column saying what a filled cell and what an empty cell
//! do at that position. [`RowLayout::transition`] is a pure function of the
//! cursor position and the cell class, so every reset and advance rule can be
//! tested on its own. [`RowMachine`] applies the transitions to records.
//!
//! A record is appended only when its terminal column is assigned, and is
//! never touched again afterwards.

use std::fmt;

/// What a filled cell does at a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFilled<F> {
    /// Store the cell in this field and advance.
    Assign(F),
    /// Advance without storing (decorative columns).
    Skip,
    /// Unexpected content; drop the row in progress.
    Reset,
}

/// What an empty cell does at a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEmpty<F> {
    /// The column may legitimately be blank; advance.
    Advance,
    /// Blank is a legitimate value for this field; store `""` and advance.
    AssignBlank(F),
    /// Blank means end of row or corruption; drop the row in progress.
    Reset,
}

/// Behavior of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec<F> {
    /// Filled-cell transition.
    pub on_filled: OnFilled<F>,
    /// Empty-cell transition.
    pub on_empty: OnEmpty<F>,
}

impl<F> ColumnSpec<F> {
    /// A required field: filled assigns, empty resets.
    pub const fn field(field: F) -> Self {
        Self {
            on_filled: OnFilled::Assign(field),
            on_empty: OnEmpty::Reset,
        }
    }

    /// A field that may be blank.
    pub const fn optional(field: F) -> Self
    where
        F: Copy,
    {
        Self {
            on_filled: OnFilled::Assign(field),
            on_empty: OnEmpty::AssignBlank(field),
        }
    }

    /// A decorative column whose content is ignored.
    pub const fn ignored() -> Self {
        Self {
            on_filled: OnFilled::Skip,
            on_empty: OnEmpty::Advance,
        }
    }
}

/// Classification of a cell before it reaches the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    /// Blank cell.
    Empty,
    /// Displayable content.
    Filled,
}

/// Outcome of feeding one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<F> {
    /// Store into `field`; the cursor moves to `next`.
    Assign { field: F, next: usize },
    /// Store into `field`; the record is complete.
    Complete { field: F },
    /// Move the cursor without storing.
    Advance { next: usize },
    /// Drop the row in progress.
    Reset,
}

/// How an identifier marker cell interacts with the row in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// The marker attaches to whatever row is in progress.
    Attach,
    /// The marker opens a row; a partially filled row in progress is dropped.
    Restart,
    /// As [`MarkerPolicy::Restart`], and filled cells before any marker are rejected.
    Gate,
}

/// Column layout of one document type.
#[derive(Debug, Clone, Copy)]
pub struct RowLayout<F: 'static> {
    /// Columns in order; the last one is terminal.
    pub columns: &'static [ColumnSpec<F>],
    /// Marker handling.
    pub marker: MarkerPolicy,
}

impl<F: Copy> RowLayout<F> {
    /// Transition for a cell of class `class` arriving at cursor `position`.
    ///
    /// `armed` is whether the row has seen its marker (ignored by layouts
    /// that do not require one).
    #[must_use]
    pub fn transition(&self, position: usize, class: CellClass, armed: bool) -> Transition<F> {
        if self.marker == MarkerPolicy::Gate && !armed {
            return Transition::Reset;
        }
        let Some(column) = self.columns.get(position) else {
            return Transition::Reset;
        };
        let next = position + 1;
        let is_last = next == self.columns.len();

        let assign = |field: F| {
            if is_last {
                Transition::Complete { field }
            } else {
                Transition::Assign { field, next }
            }
        };

        match class {
            CellClass::Filled => match column.on_filled {
                OnFilled::Assign(field) => assign(field),
                OnFilled::Skip if is_last => Transition::Reset,
                OnFilled::Skip => Transition::Advance { next },
                OnFilled::Reset => Transition::Reset,
            },
            CellClass::Empty => match column.on_empty {
                OnEmpty::AssignBlank(field) => assign(field),
                OnEmpty::Advance if is_last => Transition::Reset,
                OnEmpty::Advance => Transition::Advance { next },
                OnEmpty::Reset => Transition::Reset,
            },
        }
    }
}

/// A record that can be built column by column.
pub trait RowRecord: Default + Clone {
    /// Column field identifiers.
    type Field: Copy + fmt::Debug;

    /// Stores `value` into `field`.
    fn assign(&mut self, field: Self::Field, value: &str);
}

/// Walks cells through a [`RowLayout`], collecting completed records.
#[derive(Debug)]
pub struct RowMachine<R: RowRecord + 'static> {
    layout: RowLayout<R::Field>,
    position: usize,
    armed: bool,
    template: R,
    current: R,
    records: Vec<R>,
    dropped: usize,
}

impl<R: RowRecord + 'static> RowMachine<R> {
    /// Starts a machine with an empty record in progress.
    #[must_use]
    pub fn new(layout: RowLayout<R::Field>) -> Self {
        Self::with_template(layout, R::default())
    }

    /// Starts a machine whose fresh records are copies of `template`.
    #[must_use]
    pub fn with_template(layout: RowLayout<R::Field>, template: R) -> Self {
        Self {
            layout,
            position: 0,
            armed: false,
            current: template.clone(),
            template,
            records: Vec::new(),
            dropped: 0,
        }
    }

    /// Applies an identifier marker according to the layout's [`MarkerPolicy`].
    ///
    /// The cursor position is not advanced.
    pub fn mark(&mut self, apply: impl FnOnce(&mut R)) {
        if self.layout.marker != MarkerPolicy::Attach && self.position > 0 {
            self.reset();
        }
        apply(&mut self.current);
        self.armed = true;
    }

    /// Feeds one cell.
    pub fn feed(&mut self, class: CellClass, value: &str) {
        match self.layout.transition(self.position, class, self.armed) {
            Transition::Assign { field, next } => {
                self.current.assign(field, value);
                self.position = next;
            }
            Transition::Complete { field } => {
                self.current.assign(field, value);
                let record = std::mem::replace(&mut self.current, self.template.clone());
                self.records.push(record);
                self.position = 0;
                self.armed = false;
            }
            Transition::Advance { next } => self.position = next,
            Transition::Reset => self.reset(),
        }
    }

    fn reset(&mut self) {
        if self.position > 0 {
            self.dropped += 1;
        }
        self.current = self.template.clone();
        self.position = 0;
        self.armed = false;
    }

    /// Current cursor position (number of columns consumed).
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of partially filled rows dropped so far.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Completed records, in row order. A trailing partial row is discarded.
    #[must_use]
    pub fn finish(self) -> Vec<R> {
        self.records
    }
}
