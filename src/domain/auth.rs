//! Client-side state for the OTP based signup, login and password reset
//! screens.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OtpStep {
    /// Collecting email/password or signup details.
    #[default]
    Details,
    AwaitingOtp,
    Completed,
}

/// Two-step OTP exchange: request a code, then verify it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OtpFlow {
    step: OtpStep,
    message: Option<String>,
    pending: bool,
}

impl OtpFlow {
    pub fn step(&self) -> OtpStep {
        self.step
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Marks a request in flight. Returns false if one already is.
    pub fn begin(&mut self) -> bool {
        if self.pending || self.step == OtpStep::Completed {
            return false;
        }
        self.pending = true;
        true
    }

    /// Server accepted the details and sent a code.
    pub fn otp_sent(&mut self, message: Option<String>) {
        self.pending = false;
        self.step = OtpStep::AwaitingOtp;
        self.message = Some(message.unwrap_or_else(|| "OTP Sent".to_string()));
    }

    /// Server accepted the code.
    pub fn verified(&mut self, message: Option<String>, fallback: &str) {
        self.pending = false;
        self.step = OtpStep::Completed;
        self.message = Some(message.unwrap_or_else(|| fallback.to_string()));
    }

    /// A request failed; the step is unchanged so the user can retry.
    pub fn failed(&mut self, message: impl Into<String>) {
        self.pending = false;
        self.message = Some(message.into());
    }

    /// Back to the details step, e.g. to correct the email address.
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub language: String,
}

impl Default for SignupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            phone_number: String::new(),
            role: "user".to_string(),
            address: String::new(),
            district: String::new(),
            state: String::new(),
            language: String::new(),
        }
    }
}

impl SignupForm {
    /// Fields the service rejects when empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
            ("phone number", &self.phone_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Logged-in user, persisted between launches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub email: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_walks_through_steps() {
        let mut flow = OtpFlow::default();
        assert!(flow.begin());
        assert!(!flow.begin());
        flow.otp_sent(None);
        assert_eq!(flow.step(), OtpStep::AwaitingOtp);
        assert_eq!(flow.message(), Some("OTP Sent"));

        assert!(flow.begin());
        flow.verified(Some("Welcome back".into()), "Login successful");
        assert_eq!(flow.step(), OtpStep::Completed);
        assert_eq!(flow.message(), Some("Welcome back"));
        assert!(!flow.begin());
    }

    #[test]
    fn failure_keeps_step_and_clears_pending() {
        let mut flow = OtpFlow::default();
        flow.begin();
        flow.otp_sent(Some("Code sent".into()));
        flow.begin();
        flow.failed("Invalid OTP");
        assert_eq!(flow.step(), OtpStep::AwaitingOtp);
        assert!(!flow.is_pending());
        assert_eq!(flow.message(), Some("Invalid OTP"));

        flow.restart();
        assert_eq!(flow.step(), OtpStep::Details);
        assert_eq!(flow.message(), None);
    }

    #[test]
    fn signup_defaults_to_user_role() {
        let form = SignupForm::default();
        assert_eq!(form.role, "user");
        assert_eq!(
            form.missing_fields(),
            vec!["name", "email", "password", "phone number"]
        );
    }
}
