//! 用户输入校验
//!
//! 输入是原始 JSON 对象；非字符串的 name/email 视为未提供。
//! 每个函数只报告第一条违反的规则。

use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;

use super::model::{AgeChange, NewUser, UserChanges};
use crate::core::error::{AppError, AppResult};

const AGE_MESSAGE: &str = "age must be a non-negative integer";

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}

/// 字符串去除首尾空白；缺失、null 或非字符串返回 `None`
pub fn normalize(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        _ => None,
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// 解析路径中的 id：仅接受十进制正整数
///
/// `1.0`、`1e3`、` 7` 这类数字写法一律拒绝，只接受纯十进制数字。
pub fn parse_id(raw: &str) -> AppResult<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("Invalid id"));
    }
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid("Invalid id")),
    }
}

pub fn validate_for_create(input: &Map<String, Value>) -> AppResult<NewUser> {
    let name = normalize(input.get("name")).filter(|s| !s.is_empty());
    let email = normalize(input.get("email")).filter(|s| !s.is_empty());

    let name = name.ok_or_else(|| invalid("name is required"))?;
    let email = email.ok_or_else(|| invalid("email is required"))?;
    if !is_valid_email(&email) {
        return Err(invalid("email is invalid"));
    }

    // 新建时 null 不是合法的 age，只有更新才能清空
    let age = match parse_age(input.get("age"))? {
        AgeChange::Keep => None,
        AgeChange::Set(age) => Some(age),
        AgeChange::Clear => return Err(invalid(AGE_MESSAGE)),
    };

    Ok(NewUser { name, email, age })
}

pub fn validate_for_update(input: &Map<String, Value>) -> AppResult<UserChanges> {
    let name = normalize(input.get("name"));
    let email = normalize(input.get("email"));
    let age = input.get("age");

    if name.is_none() && email.is_none() && age.is_none() {
        return Err(invalid("Provide at least one of: name, email, age"));
    }
    if name.as_deref() == Some("") {
        return Err(invalid("name cannot be empty"));
    }
    if let Some(email) = email.as_deref() {
        if email.is_empty() {
            return Err(invalid("email cannot be empty"));
        }
        if !is_valid_email(email) {
            return Err(invalid("email is invalid"));
        }
    }

    Ok(UserChanges {
        name,
        email,
        age: parse_age(age)?,
    })
}

fn parse_age(value: Option<&Value>) -> AppResult<AgeChange> {
    match value {
        None => Ok(AgeChange::Keep),
        Some(Value::Null) => Ok(AgeChange::Clear),
        Some(Value::Number(n)) => whole_u32(n)
            .map(AgeChange::Set)
            .ok_or_else(|| invalid(AGE_MESSAGE)),
        Some(_) => Err(invalid(AGE_MESSAGE)),
    }
}

// 25 与 25.0 都是整数
fn whole_u32(n: &Number) -> Option<u32> {
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).ok();
    }
    let f = n.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Some(&json!("  John "))), Some("John".to_string()));
        assert_eq!(normalize(Some(&json!("   "))), Some(String::new()));
        assert_eq!(normalize(Some(&json!(42))), None);
        assert_eq!(normalize(Some(&Value::Null)), None);
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john doe@example.com"));
        assert!(!is_valid_email("john@@example.com"));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("42").unwrap(), 42);
        for raw in ["abc", "0", "-1", "1.5", "1.0", "", " 7", "1e3", "99999999999999999999"] {
            assert_eq!(message(parse_id(raw).unwrap_err()), "Invalid id", "input {:?}", raw);
        }
    }

    #[test]
    fn test_create_trims_and_defaults_age() {
        let user = validate_for_create(&object(json!({
            "name": "  John ",
            "email": " john@example.com ",
        })))
        .unwrap();

        assert_eq!(
            user,
            NewUser {
                name: "John".into(),
                email: "john@example.com".into(),
                age: None,
            }
        );
    }

    #[test]
    fn test_create_rule_order() {
        let cases = [
            (json!({}), "name is required"),
            (json!({ "name": "   ", "email": "x@y.z" }), "name is required"),
            (json!({ "name": 7, "email": "x@y.z" }), "name is required"),
            (json!({ "name": "John" }), "email is required"),
            (json!({ "name": "John", "email": "not-an-email" }), "email is invalid"),
            (
                json!({ "name": "John", "email": "john@example.com", "age": -1 }),
                AGE_MESSAGE,
            ),
        ];

        for (input, expected) in cases {
            let err = validate_for_create(&object(input.clone())).unwrap_err();
            assert_eq!(message(err), expected, "input {}", input);
        }
    }

    #[test]
    fn test_age_rules() {
        let base = |age: Value| object(json!({ "name": "A", "email": "a@b.co", "age": age }));

        assert_eq!(validate_for_create(&base(json!(0))).unwrap().age, Some(0));
        assert_eq!(validate_for_create(&base(json!(25.0))).unwrap().age, Some(25));

        for bad in [Value::Null, json!(2.5), json!("25"), json!(true), json!(-3), json!(1u64 << 40)] {
            assert_eq!(message(validate_for_create(&base(bad)).unwrap_err()), AGE_MESSAGE);
        }
    }

    #[test]
    fn test_update_requires_a_field() {
        let err = validate_for_update(&object(json!({}))).unwrap_err();
        assert_eq!(message(err), "Provide at least one of: name, email, age");

        // 非字符串字段等同于未提供
        let err = validate_for_update(&object(json!({ "name": 1, "email": false }))).unwrap_err();
        assert_eq!(message(err), "Provide at least one of: name, email, age");
    }

    #[test]
    fn test_update_field_rules() {
        let err = validate_for_update(&object(json!({ "name": "  " }))).unwrap_err();
        assert_eq!(message(err), "name cannot be empty");

        let err = validate_for_update(&object(json!({ "email": "" }))).unwrap_err();
        assert_eq!(message(err), "email cannot be empty");

        let err = validate_for_update(&object(json!({ "email": "nope" }))).unwrap_err();
        assert_eq!(message(err), "email is invalid");

        let err = validate_for_update(&object(json!({ "age": "31" }))).unwrap_err();
        assert_eq!(message(err), AGE_MESSAGE);

        let err = validate_for_update(&object(json!({ "name": "", "age": "31" }))).unwrap_err();
        assert_eq!(message(err), "name cannot be empty");
    }

    #[test]
    fn test_update_partial_changes() {
        let changes = validate_for_update(&object(json!({ "age": 31 }))).unwrap();
        assert_eq!(
            changes,
            UserChanges {
                name: None,
                email: None,
                age: AgeChange::Set(31),
            }
        );

        let changes = validate_for_update(&object(json!({ "age": null }))).unwrap();
        assert_eq!(changes.age, AgeChange::Clear);
        assert!(!changes.is_empty());

        let changes = validate_for_update(&object(json!({ "name": " Jane " }))).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Jane"));
        assert!(changes.age.is_keep());
    }
}
