// Wizard pages and the fields that live on them.

use std::fmt;

/// One page of the wizard. The first three pages collect input; the last one is a read-only
/// summary that submits the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    PersonalInfo,
    Address,
    Account,
    Summary,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::PersonalInfo,
        Step::Address,
        Step::Account,
        Step::Summary,
    ];

    /// Pages that own a form (everything except the summary).
    pub const FORMS: [Step; 3] = [Step::PersonalInfo, Step::Address, Step::Account];

    /// 1-based position shown in the progress indicator.
    pub fn number(&self) -> u8 {
        match self {
            Step::PersonalInfo => 1,
            Step::Address => 2,
            Step::Account => 3,
            Step::Summary => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Step::PersonalInfo),
            2 => Some(Step::Address),
            3 => Some(Step::Account),
            4 => Some(Step::Summary),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        Self::from_number(self.number().saturating_sub(1))
    }

    /// Short label used by the progress indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal",
            Step::Address => "Address",
            Step::Account => "Account",
            Step::Summary => "Summary",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal Information",
            Step::Address => "Address Details",
            Step::Account => "Account Setup",
            Step::Summary => "Review Your Information",
        }
    }

    pub fn fields(&self) -> &'static [FieldId] {
        match self {
            Step::PersonalInfo => &[FieldId::FullName, FieldId::Email, FieldId::PhoneNumber],
            Step::Address => &[FieldId::StreetAddress, FieldId::City, FieldId::ZipCode],
            Step::Account => &[
                FieldId::Username,
                FieldId::Password,
                FieldId::ConfirmPassword,
            ],
            Step::Summary => &[],
        }
    }

    fn as_id(&self) -> &'static str {
        match self {
            Step::PersonalInfo => "personal",
            Step::Address => "address",
            Step::Account => "account",
            Step::Summary => "summary",
        }
    }

    /// Parse a page id (`personal`, `address`, `account`, `summary`).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_id() == id)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_id())
    }
}

/// Every input field of the wizard. Each field belongs to exactly one [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    FullName,
    Email,
    PhoneNumber,
    StreetAddress,
    City,
    ZipCode,
    Username,
    Password,
    ConfirmPassword,
}

impl FieldId {
    /// Stable key, matching the names used in the submitted record.
    pub fn key(&self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::Email => "email",
            FieldId::PhoneNumber => "phoneNumber",
            FieldId::StreetAddress => "streetAddress",
            FieldId::City => "city",
            FieldId::ZipCode => "zipCode",
            FieldId::Username => "username",
            FieldId::Password => "password",
            FieldId::ConfirmPassword => "confirmPassword",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::FullName => "Full Name",
            FieldId::Email => "Email",
            FieldId::PhoneNumber => "Phone Number",
            FieldId::StreetAddress => "Street Address",
            FieldId::City => "City",
            FieldId::ZipCode => "Zip Code",
            FieldId::Username => "Username",
            FieldId::Password => "Password",
            FieldId::ConfirmPassword => "Confirm Password",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FieldId::FullName => "Enter your full name",
            FieldId::Email => "Enter your email address",
            FieldId::PhoneNumber => "Enter your phone number (digits only)",
            FieldId::StreetAddress => "Enter your street address",
            FieldId::City => "Enter your city",
            FieldId::ZipCode => "Enter your zip code (digits only)",
            FieldId::Username => "Choose a username min 4 characters",
            FieldId::Password => "Enter your password",
            FieldId::ConfirmPassword => "Confirm your password",
        }
    }

    pub fn step(&self) -> Step {
        match self {
            FieldId::FullName | FieldId::Email | FieldId::PhoneNumber => Step::PersonalInfo,
            FieldId::StreetAddress | FieldId::City | FieldId::ZipCode => Step::Address,
            FieldId::Username | FieldId::Password | FieldId::ConfirmPassword => Step::Account,
        }
    }

    /// Digit-only fields: non-digit keystrokes are dropped before they reach the form values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldId::PhoneNumber | FieldId::ZipCode)
    }

    /// Secret fields are rendered masked unless the user reveals them.
    pub fn is_secret(&self) -> bool {
        matches!(self, FieldId::Password | FieldId::ConfirmPassword)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
