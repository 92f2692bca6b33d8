use super::scanner::Scanner;
use super::token::Token;

/// Transactional view over the scanner cursor.
///
/// The guard records the cursor on construction; dropping it without
/// `commit` restores that position, so speculative consumption rolls back
/// as a unit. Borrowing the scanner mutably means guards nest in strict
/// stack order and cannot interleave.
pub struct ScanGuard<'s, 'a> {
    scanner: &'s mut Scanner<'a>,
    start: usize,
    committed: bool,
}

impl<'s, 'a> ScanGuard<'s, 'a> {
    pub(crate) fn new(scanner: &'s mut Scanner<'a>) -> Self {
        let start = scanner.cursor();
        Self {
            scanner,
            start,
            committed: false,
        }
    }

    /// Consumes and returns the next token. Past end of input this keeps
    /// yielding the synthesized end token.
    pub fn next(&mut self) -> Token {
        self.scanner.advance()
    }

    /// Undoes the most recent `next`, never moving before the guard start.
    pub fn back(&mut self) {
        if self.scanner.cursor() > self.start {
            self.scanner.retreat();
        }
    }

    pub fn peek(&mut self) -> Token {
        self.scanner.peek()
    }

    /// True for the synthesized token that marks exhausted input.
    pub fn is_end_token(&self, token: Token) -> bool {
        self.scanner.is_end_token(token)
    }

    /// Keeps the net consumption instead of rolling it back on drop.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ScanGuard<'_, '_> {
    fn drop(&mut self) {
        if !self.committed {
            self.scanner.set_cursor(self.start);
        }
    }
}
