//! 4x4 key matrix scanner.
//!
//! Columns are outputs parked HIGH; rows are inputs with pull-ups.  A scan
//! drives one column LOW at a time and reads every row: a row reading LOW
//! means the key at (row, column) is closed.  At most 16 reads per scan.
//!
//! The scanner reports raw levels only; debouncing happens in
//! [`super::button`].

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::InputError;
use crate::pins::{MATRIX_COLS, MATRIX_ROWS};

/// Bitmask of closed keys, bit `row * 4 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyMask(u16);

impl KeyMask {
    pub const fn contains(self, row: usize, col: usize) -> bool {
        self.0 & (1 << (row * MATRIX_COLS + col)) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    fn insert(&mut self, row: usize, col: usize) {
        self.0 |= 1 << (row * MATRIX_COLS + col);
    }
}

pub struct Keypad<O, I> {
    cols: [O; MATRIX_COLS],
    rows: [I; MATRIX_ROWS],
}

impl<O: OutputPin, I: InputPin> Keypad<O, I> {
    /// Takes ownership of the lines and parks every column HIGH.
    pub fn new(mut cols: [O; MATRIX_COLS], rows: [I; MATRIX_ROWS]) -> Result<Self, InputError> {
        for col in &mut cols {
            col.set_high().map_err(|_| InputError::ColumnDriveFailed)?;
        }
        Ok(Self { cols, rows })
    }

    /// Scan the whole matrix.
    pub fn scan(&mut self) -> Result<KeyMask, InputError> {
        let mut mask = KeyMask::default();
        for col in 0..MATRIX_COLS {
            let closed = self.scan_column(col)?;
            for (row, &down) in closed.iter().enumerate() {
                if down {
                    mask.insert(row, col);
                }
            }
        }
        Ok(mask)
    }

    /// Read a single key, driving only its column.
    pub fn read_key(&mut self, row: usize, col: usize) -> Result<bool, InputError> {
        Ok(self.scan_column(col)?[row])
    }

    fn scan_column(&mut self, col: usize) -> Result<[bool; MATRIX_ROWS], InputError> {
        self.cols[col]
            .set_low()
            .map_err(|_| InputError::ColumnDriveFailed)?;

        let mut closed = [false; MATRIX_ROWS];
        let mut read = Ok(());
        for (row, line) in self.rows.iter_mut().enumerate() {
            match line.is_low() {
                Ok(low) => closed[row] = low,
                Err(_) => read = Err(InputError::GpioReadFailed),
            }
        }

        // Always release the column, even after a failed read.
        self.cols[col]
            .set_high()
            .map_err(|_| InputError::ColumnDriveFailed)?;
        read.map(|()| closed)
    }
}
