use std::fmt;

/// One decoded batch: a command byte per slot and a flat parameter array indexed
/// `[command][parameter]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    commands: Vec<u8>,
    params: Vec<i32>,
    message_length: usize,
}

impl Batch {
    pub(crate) fn with_capacity(batch_size: usize, message_length: usize) -> Self {
        Self {
            commands: Vec::with_capacity(batch_size),
            params: Vec::with_capacity(batch_size * message_length),
            message_length,
        }
    }

    pub(crate) fn push_command(&mut self, command: u8) {
        self.commands.push(command);
    }

    pub(crate) fn push_param(&mut self, param: i32) {
        self.params.push(param);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    /// All parameters, command after command.
    pub fn flat_params(&self) -> &[i32] {
        &self.params
    }

    /// Parameters belonging to the command at `index`.
    pub fn params(&self, index: usize) -> Option<&[i32]> {
        let start = index.checked_mul(self.message_length)?;
        let end = start.checked_add(self.message_length)?;
        self.params.get(start..end)
    }

    pub fn get(&self, command: usize, param: usize) -> Option<i32> {
        if param >= self.message_length {
            return None;
        }
        self.params(command).map(|p| p[param])
    }

    /// Iterates `(command, parameters)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[i32])> {
        self.commands
            .iter()
            .copied()
            .zip(self.params.chunks(self.message_length))
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (command, params)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{command}")?;
            for p in params {
                write!(f, " {p}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Batch {
        let mut batch = Batch::with_capacity(2, 3);
        batch.push_command(1);
        for p in [10, 11, 12] {
            batch.push_param(p);
        }
        batch.push_command(2);
        for p in [20, -21, 22] {
            batch.push_param(p);
        }
        batch
    }

    #[test]
    fn indexes_by_command_and_param() {
        let batch = sample();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.params(1), Some(&[20, -21, 22][..]));
        assert_eq!(batch.get(0, 2), Some(12));
        assert_eq!(batch.get(1, 3), None);
        assert_eq!(batch.params(2), None);
    }

    #[test]
    fn out_of_range_index_does_not_overflow() {
        let batch = sample();

        assert_eq!(batch.params(usize::MAX / 3), None);
        assert_eq!(batch.params(usize::MAX), None);
        assert_eq!(batch.get(usize::MAX / 3, 0), None);
    }

    #[test]
    fn display_one_line_per_command() {
        assert_eq!(sample().to_string(), "1 10 11 12\n2 20 -21 22");
    }
}
