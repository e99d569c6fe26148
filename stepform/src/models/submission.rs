// Finalized submission record
//
// The confirmation password is deliberately not part of this shape.

use crate::form::{FieldId, FormValues};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedSubmission {
    pub personal_info: PersonalInfo,
    pub address: Address,
    pub account: Account,
}

impl FinalizedSubmission {
    pub(crate) fn from_steps(
        personal: &FormValues,
        address: &FormValues,
        account: &FormValues,
    ) -> Self {
        let take = |values: &FormValues, field: FieldId| values.get(field).to_string();
        Self {
            personal_info: PersonalInfo {
                full_name: take(personal, FieldId::FullName),
                email: take(personal, FieldId::Email),
                phone_number: take(personal, FieldId::PhoneNumber),
            },
            address: Address {
                street_address: take(address, FieldId::StreetAddress),
                city: take(address, FieldId::City),
                zip_code: take(address, FieldId::ZipCode),
            },
            account: Account {
                username: take(account, FieldId::Username),
                password: take(account, FieldId::Password),
            },
        }
    }

    /// Copy with the password replaced by one `*` per character, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.account.password = "*".repeat(self.account.password.chars().count());
        copy
    }
}
