//! Line diffs
//!
//! [`MyersDiff`] finds a minimal edit script between two sequences with Myers' O(ND) greedy
//! search; [`Hunk::filter`] windows that script into unified-diff hunks with
//! [`HUNK_CONTEXT`] lines of context on each side.

use derive_new::new;
use std::fmt::Display;

/// Unchanged lines kept around every change.
pub const HUNK_CONTEXT: usize = 3;

/// One step of an edit script. Line numbers are 1-based positions in the old (`a`) and new
/// (`b`) sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { a_line: usize, value: T },
    Insert { b_line: usize, value: T },
    Equal { a_line: usize, b_line: usize, value: T },
}

impl<T> Edit<T> {
    pub fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }

    pub fn a_line(&self) -> Option<usize> {
        match self {
            Edit::Delete { a_line, .. } | Edit::Equal { a_line, .. } => Some(*a_line),
            Edit::Insert { .. } => None,
        }
    }

    pub fn b_line(&self) -> Option<usize> {
        match self {
            Edit::Insert { b_line, .. } | Edit::Equal { b_line, .. } => Some(*b_line),
            Edit::Delete { .. } => None,
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Edit::Delete { value, .. } | Edit::Insert { value, .. } | Edit::Equal { value, .. } => {
                value
            }
        }
    }
}

impl<T: Display> Display for Edit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edit::Delete { value, .. } => write!(f, "-{value}"),
            Edit::Insert { value, .. } => write!(f, "+{value}"),
            Edit::Equal { value, .. } => write!(f, " {value}"),
        }
    }
}

pub trait DiffAlgorithm<T: Clone> {
    fn diff(&self) -> Vec<Edit<T>>;

    fn hunks(&self) -> Vec<Hunk<T>> {
        Hunk::filter(&self.diff())
    }
}

/// A move between two points of the edit graph: `(prev_x, prev_y, x, y)`.
type Step = (isize, isize, isize, isize);

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> MyersDiff<'_, T> {
    /// Furthest-reaching x per diagonal, one snapshot per edit distance `d`.
    ///
    /// Diagonal `k` lives at `v[k + offset]`; the array has a spare slot on each side so that
    /// `k - 1` and `k + 1` are always addressable, including for empty inputs.
    fn shortest_edit(&self) -> (Vec<Vec<isize>>, isize) {
        let (n, m) = (self.a.len() as isize, self.b.len() as isize);
        let max = n + m;
        let offset = max + 1;

        let mut v = vec![0isize; (2 * max + 3) as usize];
        let mut trace = Vec::new();

        for d in 0..=max {
            trace.push(v.clone());

            for k in (-d..=d).step_by(2) {
                let idx = (k + offset) as usize;

                let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                    // down from k + 1: an insertion
                    v[idx + 1]
                } else {
                    // right from k - 1: a deletion
                    v[idx - 1] + 1
                };
                let mut y = x - k;

                while x < n && y < m && self.a[x as usize] == self.b[y as usize] {
                    x += 1;
                    y += 1;
                }

                v[idx] = x;

                if x >= n && y >= m {
                    return (trace, offset);
                }
            }
        }

        (trace, offset)
    }

    /// Walk the trace back from `(n, m)` to the origin, newest step first.
    fn backtrack(&self) -> Vec<Step> {
        let (mut x, mut y) = (self.a.len() as isize, self.b.len() as isize);
        let (trace, offset) = self.shortest_edit();
        let mut steps = Vec::new();

        for (d, v) in trace.iter().enumerate().rev() {
            let d = d as isize;
            let k = x - y;
            let at = |k: isize| v[(k + offset) as usize];

            let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
                k + 1
            } else {
                k - 1
            };
            let prev_x = at(prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                steps.push((x - 1, y - 1, x, y));
                x -= 1;
                y -= 1;
            }

            if d > 0 {
                steps.push((prev_x, prev_y, x, y));
            }

            (x, y) = (prev_x, prev_y);
        }

        steps
    }
}

impl<T: Eq + Clone> DiffAlgorithm<T> for MyersDiff<'_, T> {
    fn diff(&self) -> Vec<Edit<T>> {
        let mut edits = self
            .backtrack()
            .into_iter()
            .map(|(prev_x, prev_y, x, y)| {
                let (a_index, b_index) = (prev_x as usize, prev_y as usize);
                if x == prev_x {
                    Edit::Insert {
                        b_line: b_index + 1,
                        value: self.b[b_index].clone(),
                    }
                } else if y == prev_y {
                    Edit::Delete {
                        a_line: a_index + 1,
                        value: self.a[a_index].clone(),
                    }
                } else {
                    Edit::Equal {
                        a_line: a_index + 1,
                        b_line: b_index + 1,
                        value: self.a[a_index].clone(),
                    }
                }
            })
            .collect::<Vec<_>>();

        edits.reverse();
        edits
    }
}

/// A contiguous, context-padded window of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk<T> {
    /// Old/new lines that precede the hunk
    a_before: usize,
    b_before: usize,
    edits: Vec<Edit<T>>,
}

impl<T: Clone> Hunk<T> {
    /// Group an edit script into hunks. A hunk opens [`HUNK_CONTEXT`] lines before the first
    /// change and stays open while another change follows within [`HUNK_CONTEXT`] lines.
    pub fn filter(edits: &[Edit<T>]) -> Vec<Hunk<T>> {
        let context = HUNK_CONTEXT as isize;
        let len = edits.len() as isize;
        let mut hunks = Vec::new();
        let mut offset: isize = 0;

        loop {
            while offset < len && edits[offset as usize].is_equal() {
                offset += 1;
            }
            if offset >= len {
                return hunks;
            }

            offset -= context + 1;
            let first = offset.max(-1) + 1;
            let preceding = &edits[..first as usize];

            let mut hunk = Hunk {
                a_before: preceding.iter().filter(|edit| edit.a_line().is_some()).count(),
                b_before: preceding.iter().filter(|edit| edit.b_line().is_some()).count(),
                edits: Vec::new(),
            };
            offset = hunk.build(edits, offset);
            hunks.push(hunk);
        }
    }

    fn build(&mut self, edits: &[Edit<T>], mut offset: isize) -> isize {
        let context = HUNK_CONTEXT as isize;
        let len = edits.len() as isize;
        let mut counter: isize = -1;

        while counter != 0 {
            if offset >= 0 && counter > 0 {
                self.edits.push(edits[offset as usize].clone());
            }

            offset += 1;
            if offset >= len {
                break;
            }

            match edits.get((offset + context) as usize) {
                Some(edit) if !edit.is_equal() => counter = 2 * context + 1,
                _ => counter -= 1,
            }
        }

        offset
    }
}

impl<T> Hunk<T> {
    pub fn edits(&self) -> &[Edit<T>] {
        &self.edits
    }

    pub fn a_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.a_line().is_some()).count()
    }

    pub fn b_size(&self) -> usize {
        self.edits.iter().filter(|edit| edit.b_line().is_some()).count()
    }

    /// First old line in the hunk; an empty side reports the line it follows.
    pub fn a_start(&self) -> usize {
        self.edits
            .iter()
            .find_map(Edit::a_line)
            .unwrap_or(self.a_before)
    }

    pub fn b_start(&self) -> usize {
        self.edits
            .iter()
            .find_map(Edit::b_line)
            .unwrap_or(self.b_before)
    }

    /// `@@ -<a_start>,<a_size> +<b_start>,<b_size> @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.a_start(),
            self.a_size(),
            self.b_start(),
            self.b_size()
        )
    }
}
