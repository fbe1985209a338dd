//! Cursor over SGR parameters

use vte::Params;

/// Flattened SGR parameters with explicit consumption.
///
/// Colon sub-parameters (`38:5:196`) flatten to the same sequence as their
/// semicolon form (`38;5;196`).
#[derive(Debug, Clone, Default)]
pub struct ParamCursor {
    params: Vec<u16>,
    pos: usize,
}

impl ParamCursor {
    pub fn new(params: &Params) -> Self {
        Self {
            params: params.iter().flatten().copied().collect(),
            pos: 0,
        }
    }

    #[cfg(test)]
    pub fn from_slice(params: &[u16]) -> Self {
        Self {
            params: params.to_vec(),
            pos: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Take the next top-level parameter
    pub fn next_code(&mut self) -> Option<u16> {
        let code = self.params.get(self.pos).copied()?;
        self.pos += 1;
        Some(code)
    }

    /// Take the next `n` parameters only if all of them are present.
    ///
    /// On a short read nothing is consumed.
    pub fn consume(&mut self, n: usize) -> Option<&[u16]> {
        let end = self.pos.checked_add(n)?;
        if end > self.params.len() {
            return None;
        }
        let taken = &self.params[self.pos..end];
        self.pos = end;
        Some(taken)
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.params.len() - self.pos
    }
}
