use crate::config::{ConfigError, MatrixConfig};
use crate::driver::gpio::Gpio;
use crate::event::KeyPos;

/// Sides, rows and columns are each addressed by a `u8` in [`KeyPos`]
pub const MAX_MATRIX_DIMENSION: usize = u8::MAX as usize + 1;

/// Raw readings of one complete scan.
///
/// `true` means the key's switch is electrically engaged, the wiring polarity
/// has already been applied. Stored as `[side][row][col]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawSnapshot<const SIDE: usize, const ROW: usize, const COL: usize> {
    engaged: [[[bool; COL]; ROW]; SIDE],
}

impl<const SIDE: usize, const ROW: usize, const COL: usize> Default for RawSnapshot<SIDE, ROW, COL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIDE: usize, const ROW: usize, const COL: usize> RawSnapshot<SIDE, ROW, COL> {
    /// A snapshot with every key released
    pub const fn new() -> Self {
        const {
            assert!(
                SIDE <= MAX_MATRIX_DIMENSION && ROW <= MAX_MATRIX_DIMENSION && COL <= MAX_MATRIX_DIMENSION,
                "matrix dimension doesn't fit a key position"
            )
        };
        Self {
            engaged: [[[false; COL]; ROW]; SIDE],
        }
    }

    /// Reading of `pos`, `false` if `pos` is outside the matrix
    pub fn is_engaged(&self, pos: KeyPos) -> bool {
        self.engaged
            .get(pos.side as usize)
            .and_then(|side| side.get(pos.row as usize))
            .and_then(|row| row.get(pos.col as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Set the reading of `pos`, positions outside the matrix are ignored
    pub fn set(&mut self, pos: KeyPos, engaged: bool) {
        if let Some(cell) = self
            .engaged
            .get_mut(pos.side as usize)
            .and_then(|side| side.get_mut(pos.row as usize))
            .and_then(|row| row.get_mut(pos.col as usize))
        {
            *cell = engaged;
        }
    }

    /// All readings, side by side, then row-major
    pub fn iter(&self) -> impl Iterator<Item = (KeyPos, bool)> + '_ {
        self.engaged.iter().enumerate().flat_map(|(side, rows)| {
            rows.iter().enumerate().flat_map(move |(row, cols)| {
                cols.iter()
                    .enumerate()
                    .map(move |(col, &engaged)| (KeyPos::new(side as u8, row as u8, col as u8), engaged))
            })
        })
    }
}

/// Matrix is the physical pcb layout of the keyboard matrix.
///
/// Rows are driven one at a time, every side's columns are sampled while the
/// row is active. The wiring comes from an immutable [`MatrixConfig`].
pub struct Matrix<'a, G: Gpio, const SIDE: usize, const ROW: usize, const COL: usize> {
    config: &'a MatrixConfig<SIDE, ROW, COL>,
    gpio: G,
}

impl<'a, G: Gpio, const SIDE: usize, const ROW: usize, const COL: usize> Matrix<'a, G, SIDE, ROW, COL> {
    /// Create a matrix, the wiring tables are checked against the GPIO bank.
    pub fn new(config: &'a MatrixConfig<SIDE, ROW, COL>, gpio: G) -> Result<Self, ConfigError> {
        config.validate(&gpio)?;
        Ok(Self { config, gpio })
    }

    /// Configure rows as outputs at their idle level and columns as inputs.
    pub fn init(&mut self) -> Result<(), G::Error> {
        let config = self.config;
        let idle = !config.row_active;
        for &pin in config.row_pins.iter() {
            self.gpio.configure_output(pin, idle)?;
        }
        for side in config.sides.iter() {
            for &pin in side.col_pins.iter() {
                self.gpio.configure_input(pin, side.pull)?;
            }
        }
        debug!("Matrix initialized: {} sides, {}x{}", SIDE, ROW, COL);
        Ok(())
    }

    /// Scan the whole matrix once.
    ///
    /// On a GPIO error the active row is released and the error is returned,
    /// no partial snapshot escapes.
    pub fn scan(&mut self) -> Result<RawSnapshot<SIDE, ROW, COL>, G::Error> {
        let config = self.config;
        let mut snapshot = RawSnapshot::new();
        let active = config.row_active;
        for (row, &row_pin) in config.row_pins.iter().enumerate() {
            self.gpio.write(row_pin, active)?;
            let sampled = self.sample_row(row, &mut snapshot);
            // A row must never stay selected while the next one is sampled
            let released = self.gpio.write(row_pin, !active);
            sampled?;
            released?;
        }
        Ok(snapshot)
    }

    fn sample_row(&mut self, row: usize, snapshot: &mut RawSnapshot<SIDE, ROW, COL>) -> Result<(), G::Error> {
        let config = self.config;
        for (side, group) in config.sides.iter().enumerate() {
            let engaged = group.pull.engaged_level();
            for (col, &pin) in group.col_pins.iter().enumerate() {
                snapshot.engaged[side][row][col] = self.gpio.read(pin)? == engaged;
            }
        }
        Ok(())
    }

    /// The GPIO bank, shared with other pin users such as the status led
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnGroup;
    use crate::driver::gpio::{Level, Pin, Pull};

    const CONFIG: MatrixConfig<2, 2, 2> = MatrixConfig {
        row_pins: [0, 1],
        row_active: Level::Low,
        sides: [ColumnGroup::pull_up([2, 3]), ColumnGroup::pull_up([4, 5])],
    };

    /// Electrical model of a 2x2x2 pull-up matrix
    #[derive(Default)]
    struct Board {
        levels: [Option<Level>; 6],
        pressed: [[[bool; 2]; 2]; 2],
        fail_read_at: Option<Pin>,
        reads: usize,
    }

    impl Gpio for Board {
        type Error = Pin;

        fn configure_output(&mut self, pin: Pin, initial: Level) -> Result<(), Pin> {
            self.levels[pin as usize] = Some(initial);
            Ok(())
        }
        fn configure_input(&mut self, _pin: Pin, pull: Pull) -> Result<(), Pin> {
            assert_eq!(pull, Pull::Up);
            Ok(())
        }
        fn write(&mut self, pin: Pin, level: Level) -> Result<(), Pin> {
            self.levels[pin as usize] = Some(level);
            Ok(())
        }
        fn read(&mut self, pin: Pin) -> Result<Level, Pin> {
            if self.fail_read_at == Some(pin) {
                return Err(pin);
            }
            self.reads += 1;
            let active_rows: heapless::Vec<usize, 2> =
                (0..2).filter(|&r| self.levels[r] == Some(Level::Low)).collect();
            assert!(active_rows.len() <= 1, "two rows selected at once");
            let (side, col) = ((pin as usize - 2) / 2, (pin as usize - 2) % 2);
            let engaged = active_rows.iter().any(|&r| self.pressed[side][r][col]);
            Ok(if engaged { Level::Low } else { Level::High })
        }
        fn toggle(&mut self, pin: Pin) -> Result<(), Pin> {
            self.levels[pin as usize] = self.levels[pin as usize].map(|l| !l);
            Ok(())
        }
        fn is_valid_pin(&self, pin: Pin) -> bool {
            pin < 6
        }
    }

    #[test]
    fn test_scan_inverts_pull_up_readings() {
        let mut board = Board::default();
        board.pressed[0][1][0] = true;
        board.pressed[1][0][1] = true;
        let mut matrix = Matrix::new(&CONFIG, board).unwrap();
        matrix.init().unwrap();

        let snapshot = matrix.scan().unwrap();
        let engaged: heapless::Vec<KeyPos, 8> = snapshot.iter().filter(|(_, e)| *e).map(|(p, _)| p).collect();
        assert_eq!(engaged.as_slice(), &[KeyPos::new(0, 1, 0), KeyPos::new(1, 0, 1)]);
        assert_eq!(matrix.gpio_mut().reads, 8);
    }

    #[test]
    fn test_rows_released_after_scan() {
        let mut matrix = Matrix::new(&CONFIG, Board::default()).unwrap();
        matrix.init().unwrap();
        matrix.scan().unwrap();
        assert_eq!(matrix.gpio_mut().levels[0], Some(Level::High));
        assert_eq!(matrix.gpio_mut().levels[1], Some(Level::High));
    }

    #[test]
    fn test_read_fault_releases_row() {
        let board = Board {
            fail_read_at: Some(4),
            ..Default::default()
        };
        let mut matrix = Matrix::new(&CONFIG, board).unwrap();
        matrix.init().unwrap();
        assert_eq!(matrix.scan(), Err(4));
        assert_eq!(matrix.gpio_mut().levels[0], Some(Level::High));
    }

    #[test]
    fn test_invalid_wiring_rejected() {
        let mut config = CONFIG;
        config.row_pins[1] = 9;
        assert!(matches!(
            Matrix::new(&config, Board::default()),
            Err(ConfigError::InvalidPin(9))
        ));
    }

    #[test]
    fn test_snapshot_accessors() {
        let mut snapshot: RawSnapshot<1, 2, 3> = RawSnapshot::new();
        snapshot.set(KeyPos::new(0, 1, 2), true);
        snapshot.set(KeyPos::new(3, 0, 0), true);
        assert!(snapshot.is_engaged(KeyPos::new(0, 1, 2)));
        assert!(!snapshot.is_engaged(KeyPos::new(3, 0, 0)));
        assert_eq!(snapshot.iter().count(), 6);
        assert_eq!(snapshot.iter().last(), Some((KeyPos::new(0, 1, 2), true)));
    }

    #[test]
    fn test_widest_matrix_keeps_every_column() {
        let mut snapshot: RawSnapshot<1, 1, MAX_MATRIX_DIMENSION> = RawSnapshot::new();
        snapshot.set(KeyPos::new(0, 0, u8::MAX), true);
        let engaged: heapless::Vec<KeyPos, 2> = snapshot.iter().filter(|(_, e)| *e).map(|(p, _)| p).collect();
        assert_eq!(engaged.as_slice(), &[KeyPos::new(0, 0, u8::MAX)]);
        assert_eq!(snapshot.iter().count(), MAX_MATRIX_DIMENSION);
    }
}
