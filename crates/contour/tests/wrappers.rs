//! Wrapper nodes: optional, nullable, default, catch, refine, transform, pipe.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use contour::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

/// A leaf that counts how often it runs.
fn counted(calls: &Arc<AtomicUsize>) -> CustomSchema {
    let calls = Arc::clone(calls);
    custom(move |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        true
    })
}

// ============================================================================
// SHORT-CIRCUITS
// ============================================================================

#[test]
fn test_optional_skips_child_on_undefined() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = counted(&calls).optional();

    assert_eq!(schema.parse_opt(None).unwrap(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(schema.parse(&json!(1)).unwrap(), json!(1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_nullable_skips_child_on_null() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = counted(&calls).nullable();

    assert_eq!(schema.parse(&Value::Null).unwrap(), Value::Null);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_nullable_does_not_accept_undefined() {
    let schema = string().nullable();
    assert!(schema.parse_opt(None).is_err());
    assert!(schema.optional().parse_opt(None).is_ok());
}

#[test]
fn test_default_fills_missing_without_running_child() {
    let calls = Arc::new(AtomicUsize::new(0));
    let schema = object! { retries: counted(&calls).default(3) };

    assert_eq!(schema.parse(&json!({})).unwrap(), json!({ "retries": 3 }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_catch_replaces_any_failure() {
    let schema = object! { port: number().int().catch(8080) };
    assert_eq!(
        schema.parse(&json!({ "port": "eighty" })).unwrap(),
        json!({ "port": 8080 })
    );
    assert_eq!(
        schema.parse(&json!({})).unwrap(),
        json!({ "port": 8080 })
    );
}

// ============================================================================
// REFINEMENTS
// ============================================================================

#[test]
fn test_refine_runs_after_inner_succeeds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let schema = number().min(0.0).refine(
        move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
            false
        },
        "never",
    );

    let error = schema.parse(&json!(-1)).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let error = schema.parse(&json!(1)).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::Custom);
    assert_eq!(error.issues()[0].message, "never");
}

#[test]
fn test_cross_field_refinement_with_path() {
    let signup = object! {
        password: string().min(4),
        confirm: string(),
    }
    .refine_with(
        |v| v["password"] == v["confirm"],
        RefineOptions::new("Passwords don't match").with_path(["confirm"]),
    );

    let form = object! { signup: signup };
    let error = form
        .parse(&json!({ "signup": { "password": "hunter2", "confirm": "hunter3" } }))
        .unwrap_err();

    assert_eq!(error.len(), 1);
    assert_eq!(error.issues()[0].path.to_string(), "signup.confirm");
}

#[test]
fn test_super_refine_adds_several_issues() {
    let schema = array(number()).super_refine(|value, ctx| {
        let items = value.as_array().map_or(&[][..], Vec::as_slice);
        for (index, item) in items.iter().enumerate() {
            if item.as_f64().is_some_and(|n| n < 0.0) {
                ctx.add_issue(
                    ValidationIssue::custom("Negative").with_path(Path::root().join(index)),
                );
            }
        }
    });

    let error = schema.parse(&json!([1, -2, 3, -4])).unwrap_err();
    let paths: Vec<_> = error.issues().iter().map(|i| i.path.to_string()).collect();
    assert_eq!(paths, ["1", "3"]);
}

#[test]
fn test_failing_callback_normalized_at_boundary() {
    let schema = object! {
        code: string().try_refine(|_| Err("lookup service down".into()), "Unknown code"),
        other: number(),
    };

    let error = schema
        .parse(&json!({ "code": "x", "other": "not a number" }))
        .unwrap_err();
    assert_eq!(error.len(), 1);
    assert_eq!(error.issues()[0].code, IssueCode::UnknownError);
    assert!(error.issues()[0].message.contains("lookup service down"));
}

// ============================================================================
// TRANSFORM AND PIPE
// ============================================================================

#[test]
fn test_transform_then_pipe() {
    let schema = string()
        .trim()
        .transform(|v| json!(v.as_str().map_or(0, str::len)))
        .pipe(number().max(5.0));

    assert_eq!(schema.parse(&json!("  abc  ")).unwrap(), json!(3));

    let error = schema.parse(&json!("abcdefgh")).unwrap_err();
    assert_eq!(error.issues()[0].code, IssueCode::TooBig);
}

#[test]
fn test_transform_skipped_on_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let schema = number().transform(move |v| {
        seen.fetch_add(1, Ordering::SeqCst);
        v
    });

    assert!(schema.parse(&json!("x")).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_brand_has_no_runtime_effect() {
    let plain = number().int();
    let branded = number().int().brand("UserId");
    for input in [json!(1), json!(1.5), json!("1")] {
        assert_eq!(
            branded.parse(&input).is_ok(),
            plain.parse(&input).is_ok()
        );
    }
}
