//! This module provides ways to tweak a [`TaskStore`](crate::store::TaskStore), so that it can return errors on some tests

use std::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked store will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub save_behaviour: (u32, u32),
    pub delete_behaviour: (u32, u32),
    pub get_by_id_behaviour: (u32, u32),
    pub get_all_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            save_behaviour: (0, n_fails),
            delete_behaviour: (0, n_fails),
            get_by_id_behaviour: (0, n_fails),
            get_all_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_save(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.save_behaviour, "save")
    }
    pub fn can_delete(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_behaviour, "delete")
    }
    pub fn can_get_by_id(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_by_id_behaviour, "get_by_id")
    }
    pub fn can_get_all(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_all_behaviour, "get_all")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_save().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_save().is_err());
        assert!(now.can_delete().is_err());
        assert!(now.can_delete().is_err());
        assert!(now.can_save().is_err());
        assert!(now.can_save().is_ok());
        assert!(now.can_delete().is_ok());

        let mut custom = MockBehaviour{
            save_behaviour: (1, 2),
            ..MockBehaviour::default()
        };
        assert!(custom.can_get_all().is_ok());
        assert!(custom.can_save().is_ok());
        assert!(custom.can_save().is_err());
        custom.suspend();
        assert!(custom.can_save().is_ok());
        custom.resume();
        assert!(custom.can_save().is_err());
        assert!(custom.can_save().is_ok());
    }
}
