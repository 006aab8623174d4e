use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::types::db::user;
use crate::types::dto::common::FieldError;
use crate::validation::{rules, Validator};

/// Request model for citizen registration
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// 10-digit mobile number, with or without +91
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
    pub subscribe_newsletter: Option<bool>,
}

/// Registration input after the full rule list has passed: trimmed names,
/// lowercased email, bare-digit phone
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub agree_to_terms: bool,
    pub subscribe_newsletter: bool,
}

impl RegisterRequest {
    /// Evaluate every registration rule; all failures are reported together.
    pub fn validate(&self) -> Result<NewRegistration, Vec<FieldError>> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = rules::normalize_email(&self.email);
        let phone = self.phone.trim();

        let mut v = Validator::new();
        v.rule("firstName", first_name, rules::length_between(first_name, 2, 50, "First name"));
        v.rule("lastName", last_name, rules::length_between(last_name, 2, 50, "Last name"));
        v.rule("email", &email, rules::email(&email));
        v.rule("phone", phone, rules::indian_mobile(phone));
        v.rule_hidden("password", rules::password_min_length(&self.password));
        v.rule_hidden("password", rules::password_complexity(&self.password));
        v.rule_hidden(
            "confirmPassword",
            rules::equals(
                &self.confirm_password,
                &self.password,
                "Password confirmation does not match password",
            ),
        );
        v.rule_hidden(
            "agreeToTerms",
            rules::must_be_true(self.agree_to_terms, "You must agree to the terms and conditions"),
        );
        v.finish()?;

        Ok(NewRegistration {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
            phone: rules::normalize_mobile(phone),
            password: self.password.clone(),
            agree_to_terms: self.agree_to_terms,
            subscribe_newsletter: self.subscribe_newsletter.unwrap_or(true),
        })
    }
}

/// Request model for citizen login
#[derive(Object, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitizenLogin {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<CitizenLogin, Vec<FieldError>> {
        let email = rules::normalize_email(&self.email);

        let mut v = Validator::new();
        v.rule("email", &email, rules::email(&email));
        v.rule_hidden("password", rules::not_empty(&self.password, "Password"));
        v.finish()?;

        Ok(CitizenLogin {
            email,
            password: self.password.clone(),
        })
    }
}

/// Citizen account data, never including the password hash
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub is_active: bool,

    /// Unix timestamp of registration
    pub registration_time: i64,

    /// Unix timestamp of the most recent login
    #[oai(skip_serializing_if_is_none)]
    pub last_login: Option<i64>,
}

impl From<&user::Model> for UserData {
    fn from(u: &user::Model) -> Self {
        Self {
            user_id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            is_active: u.is_active,
            registration_time: u.registration_time,
            last_login: u.last_login,
        }
    }
}

/// Token plus the account it was minted for
#[derive(Object, Debug)]
pub struct AuthData {
    pub token: String,
    pub user: UserData,
}

#[derive(Object, Debug)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub data: AuthData,
}

/// API response for the register endpoint (201 on success)
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<RegisterResponse>),
}

#[derive(Object, Debug)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub data: AuthData,
}

#[derive(Object, Debug)]
pub struct MeData {
    pub user: UserData,
}

#[derive(Object, Debug)]
pub struct MeResponse {
    pub success: bool,
    pub data: MeData,
}
