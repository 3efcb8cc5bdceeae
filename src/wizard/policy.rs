//! Character-class policies for secrets, checked by explicit predicates.

/// Fixed-length numeric PIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinPolicy {
    pub digits: usize,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self { digits: 4 }
    }
}

impl PinPolicy {
    pub fn check(&self, pin: &str) -> Result<(), String> {
        if pin.chars().count() != self.digits || !pin.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(format!("PIN must be exactly {} digits", self.digits));
        }
        Ok(())
    }
}

/// Symbols a password may use to satisfy the symbol requirement.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: true,
        }
    }
}

impl PasswordPolicy {
    /// Lists every unmet requirement, in declaration order.
    pub fn violations(&self, password: &str) -> Vec<String> {
        let mut missing = Vec::new();
        if password.chars().count() < self.min_length {
            missing.push(format!("at least {} characters", self.min_length));
        }
        if self.require_uppercase && !password.chars().any(|ch| ch.is_ascii_uppercase()) {
            missing.push("an uppercase letter".into());
        }
        if self.require_lowercase && !password.chars().any(|ch| ch.is_ascii_lowercase()) {
            missing.push("a lowercase letter".into());
        }
        if self.require_digit && !password.chars().any(|ch| ch.is_ascii_digit()) {
            missing.push("a digit".into());
        }
        if self.require_symbol && !password.chars().any(|ch| PASSWORD_SYMBOLS.contains(ch)) {
            missing.push(format!("one of {}", PASSWORD_SYMBOLS));
        }
        missing
    }

    pub fn check(&self, password: &str) -> Result<(), String> {
        let missing = self.violations(password);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("Password must contain {}", missing.join(", ")))
        }
    }
}
