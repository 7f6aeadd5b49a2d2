use jsonb_core::{
    apply_path, assign_path, delete_path, insert_path, set_path, Jsonb, JsonbError, Path,
    PathElement, PathOp,
};

fn doc(json: &str) -> Jsonb {
    json.parse().unwrap()
}

fn path(elements: &[&str]) -> Path {
    Path::from_texts(elements)
}

fn assert_doc(actual: &Jsonb, expected: &str) {
    assert_eq!(
        actual,
        &doc(expected),
        "document mismatch:\n  actual:   {actual}\n  expected: {expected}"
    );
}

// ============================================================================
// Replace / create on objects
// ============================================================================

#[test]
fn create_adds_missing_key() {
    let out = set_path(&doc(r#"{"a":1}"#), &path(&["b"]), &Jsonb::from(2), true).unwrap();
    assert_doc(&out, r#"{"a":1,"b":2}"#);
}

#[test]
fn create_on_existing_key_replaces_value() {
    let out = set_path(&doc(r#"{"a":1}"#), &path(&["a"]), &Jsonb::from(5), true).unwrap();
    assert_doc(&out, r#"{"a":5}"#);
}

#[test]
fn create_in_empty_object() {
    let out = set_path(&doc("{}"), &path(&["a"]), &Jsonb::from(1), true).unwrap();
    assert_doc(&out, r#"{"a":1}"#);
}

#[test]
fn replace_without_create_ignores_missing_key() {
    let input = doc(r#"{"a":1}"#);
    let out = set_path(&input, &path(&["b"]), &Jsonb::from(2), false).unwrap();
    assert_eq!(out, input);
}

#[test]
fn replace_on_empty_object_returns_copy() {
    let out = set_path(&doc("{}"), &path(&["a"]), &Jsonb::from(1), false).unwrap();
    assert_doc(&out, "{}");
}

#[test]
fn create_does_not_build_missing_intermediate_levels() {
    let input = doc(r#"{"a":1}"#);
    let out = set_path(&input, &path(&["x", "y"]), &Jsonb::from(2), true).unwrap();
    assert_eq!(out, input);
}

#[test]
fn replace_nested_value_through_arrays_and_objects() {
    let input = doc(r#"{"a":[{"b":1},{"b":2}],"c":true}"#);
    let out = set_path(&input, &path(&["a", "1", "b"]), &Jsonb::from(3), false).unwrap();
    assert_doc(&out, r#"{"a":[{"b":1},{"b":3}],"c":true}"#);
}

#[test]
fn replace_with_container_value() {
    let out = set_path(
        &doc(r#"{"a":1}"#),
        &path(&["a"]),
        &doc(r#"{"z":[1,2]}"#),
        false,
    )
    .unwrap();
    assert_doc(&out, r#"{"a":{"z":[1,2]}}"#);
}

#[test]
fn integer_element_acts_as_key_text_in_objects() {
    let input = doc(r#"{"1":"x","2":"y"}"#);
    let p = Path::new(vec![PathElement::Index(1)]);
    let out = set_path(&input, &p, &Jsonb::from("z"), false).unwrap();
    assert_doc(&out, r#"{"1":"z","2":"y"}"#);
}

#[test]
fn input_document_is_left_untouched() {
    let input = doc(r#"{"a":{"b":1}}"#);
    let snapshot = input.clone();
    let _ = set_path(&input, &path(&["a", "b"]), &Jsonb::from(2), false).unwrap();
    assert_eq!(input, snapshot);
}

// ============================================================================
// Arrays
// ============================================================================

#[test]
fn replace_last_element_with_negative_index() {
    let out = set_path(&doc("[1,2,3]"), &path(&["-1"]), &Jsonb::from(9), false).unwrap();
    assert_doc(&out, "[1,2,9]");
}

#[test]
fn create_past_the_end_appends() {
    let out = set_path(&doc("[1,2]"), &path(&["10"]), &Jsonb::from(3), true).unwrap();
    assert_doc(&out, "[1,2,3]");
}

#[test]
fn create_before_the_start_prepends() {
    let out = set_path(&doc("[1,2]"), &path(&["-5"]), &Jsonb::from(0), true).unwrap();
    assert_doc(&out, "[0,1,2]");
}

#[test]
fn replace_out_of_range_leaves_array_unchanged() {
    let input = doc("[1,2]");
    assert_eq!(
        set_path(&input, &path(&["-5"]), &Jsonb::from(0), false).unwrap(),
        input
    );
    assert_eq!(
        set_path(&input, &path(&["5"]), &Jsonb::from(0), false).unwrap(),
        input
    );
}

#[test]
fn create_in_empty_array() {
    let out = set_path(&doc("[]"), &path(&["0"]), &Jsonb::from(1), true).unwrap();
    assert_doc(&out, "[1]");
}

#[test]
fn index_with_leading_whitespace_and_sign() {
    let out = set_path(&doc("[1,2,3]"), &path(&[" +1"]), &Jsonb::from(7), false).unwrap();
    assert_doc(&out, "[1,7,3]");
}

// ============================================================================
// Insert
// ============================================================================

#[test]
fn insert_before_array_element() {
    let out = insert_path(&doc(r#"{"a":[0,1,2]}"#), &path(&["a", "1"]), &Jsonb::from("new"), false)
        .unwrap();
    assert_doc(&out, r#"{"a":[0,"new",1,2]}"#);
}

#[test]
fn insert_after_array_element() {
    let out = insert_path(&doc(r#"{"a":[0,1,2]}"#), &path(&["a", "1"]), &Jsonb::from("new"), true)
        .unwrap();
    assert_doc(&out, r#"{"a":[0,1,"new",2]}"#);
}

#[test]
fn insert_after_last_element_with_negative_index() {
    let out = insert_path(&doc("[0,1,2]"), &path(&["-1"]), &Jsonb::from(3), true).unwrap();
    assert_doc(&out, "[0,1,2,3]");
}

#[test]
fn insert_adds_missing_object_key() {
    let out = insert_path(&doc(r#"{"a":1}"#), &path(&["b"]), &Jsonb::from(2), false).unwrap();
    assert_doc(&out, r#"{"a":1,"b":2}"#);
}

#[test]
fn insert_on_existing_key_is_unsupported() {
    let err = insert_path(&doc(r#"{"a":1}"#), &path(&["a"]), &Jsonb::from(2), false).unwrap_err();
    assert!(
        matches!(&err, JsonbError::UnsupportedOperation(msg) if msg.contains("cannot replace existing key")),
        "unexpected error: {err}"
    );
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn delete_nested_key_leaves_empty_object() {
    let out = delete_path(&doc(r#"{"a":{"b":1}}"#), &path(&["a", "b"])).unwrap();
    assert_doc(&out, r#"{"a":{}}"#);
}

#[test]
fn delete_array_element() {
    let out = delete_path(&doc(r#"["x","y","z"]"#), &path(&["0"])).unwrap();
    assert_doc(&out, r#"["y","z"]"#);
    let out = delete_path(&doc(r#"["x","y","z"]"#), &path(&["-1"])).unwrap();
    assert_doc(&out, r#"["x","y"]"#);
}

#[test]
fn delete_missing_target_is_a_no_op() {
    let input = doc(r#"{"a":[1]}"#);
    assert_eq!(delete_path(&input, &path(&["b"])).unwrap(), input);
    assert_eq!(delete_path(&input, &path(&["a", "3"])).unwrap(), input);
}

#[test]
fn delete_from_empty_container_returns_copy() {
    assert_doc(&delete_path(&doc("{}"), &path(&["a"])).unwrap(), "{}");
    assert_doc(&delete_path(&doc("[]"), &path(&["0"])).unwrap(), "[]");
}

// ============================================================================
// Gap filling (subscript assignment)
// ============================================================================

#[test]
fn assign_synthesizes_missing_containers() {
    let out = assign_path(&doc("{}"), &path(&["a", "1", "b"]), &Jsonb::from(1)).unwrap();
    assert_doc(&out, r#"{"a":[null,{"b":1}]}"#);
}

#[test]
fn assign_pads_empty_array_with_nulls() {
    let out = assign_path(&doc("[]"), &path(&["3"]), &Jsonb::from(1)).unwrap();
    assert_doc(&out, "[null,null,null,1]");
}

#[test]
fn assign_pads_existing_array_with_nulls() {
    let out = assign_path(&doc("[1]"), &path(&["3"]), &Jsonb::from("x")).unwrap();
    assert_doc(&out, r#"[1,null,null,"x"]"#);
}

#[test]
fn assign_builds_path_below_padded_array() {
    let out = assign_path(&doc(r#"{"a":[1]}"#), &path(&["a", "2", "k"]), &Jsonb::from(true))
        .unwrap();
    assert_doc(&out, r#"{"a":[1,null,{"k":true}]}"#);
}

#[test]
fn assign_rejects_negative_index_out_of_range() {
    let err = assign_path(&doc("[1]"), &path(&["-5"]), &Jsonb::from(0)).unwrap_err();
    assert!(matches!(err, JsonbError::UnsupportedOperation(_)));
}

#[test]
fn assign_through_scalar_is_unsupported() {
    let err = assign_path(&doc(r#"{"a":1}"#), &path(&["a", "b"]), &Jsonb::from(2)).unwrap_err();
    assert!(matches!(err, JsonbError::UnsupportedOperation(_)));
}

#[test]
fn assign_matches_bitmask_form() {
    let input = doc(r#"{"a":{}}"#);
    let p = path(&["a", "b", "0"]);
    let by_name = assign_path(&input, &p, &Jsonb::Null).unwrap();
    let op = PathOp::from_bits(0x61).unwrap();
    let by_bits = apply_path(&input, &p, Some(&Jsonb::Null), op).unwrap();
    assert_eq!(by_name, by_bits);
    assert_doc(&by_name, r#"{"a":{"b":[null]}}"#);
}

#[test]
fn delete_with_fill_gaps_leaves_missing_path_alone() {
    let input = doc(r#"{"a":1}"#);
    let op = PathOp::from_bits(0x22).unwrap();
    let out = apply_path(&input, &path(&["x", "y"]), None, op).unwrap();
    assert_eq!(out, input);

    let op = PathOp::delete().with_fill_gaps();
    let out = apply_path(&doc("[1]"), &path(&["4", "k"]), None, op).unwrap();
    assert_doc(&out, "[1]");
}

#[test]
fn replace_with_fill_gaps_does_not_create_path() {
    let input = doc(r#"{"a":[1]}"#);
    let op = PathOp::set(false).with_fill_gaps();
    let out = apply_path(&input, &path(&["a", "3", "k"]), Some(&Jsonb::from(2)), op).unwrap();
    assert_eq!(out, input);
    let out = apply_path(&input, &path(&["b", "c"]), Some(&Jsonb::from(2)), op).unwrap();
    assert_eq!(out, input);
}

#[test]
fn consistent_position_refuses_prepend_for_plain_create() {
    let input = doc("[1]");
    let prepended = set_path(&input, &path(&["-5"]), &Jsonb::from(0), true).unwrap();
    assert_doc(&prepended, "[0,1]");

    let op = PathOp::set(true).with_consistent_position();
    let err = apply_path(&input, &path(&["-5"]), Some(&Jsonb::from(0)), op).unwrap_err();
    assert!(matches!(err, JsonbError::UnsupportedOperation(_)));
}

// ============================================================================
// Errors and entry rules
// ============================================================================

#[test]
fn scalar_root_is_unsupported() {
    let err = set_path(&doc("5"), &path(&["a"]), &Jsonb::from(1), true).unwrap_err();
    assert_eq!(err.to_string(), "Unsupported operation: cannot set path in scalar");
    let err = delete_path(&doc(r#""s""#), &path(&["a"])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported operation: cannot delete path in scalar"
    );
}

#[test]
fn empty_path_returns_copy() {
    let input = doc(r#"{"a":1}"#);
    assert_eq!(
        set_path(&input, &Path::default(), &Jsonb::from(2), true).unwrap(),
        input
    );
}

#[test]
fn null_path_element_is_malformed() {
    let p = Path::new(vec![PathElement::from("a"), PathElement::Null]);
    let err = set_path(&doc(r#"{"a":{"b":1}}"#), &p, &Jsonb::from(2), true).unwrap_err();
    assert!(matches!(err, JsonbError::MalformedPath(_)));
}

#[test]
fn non_integer_array_index_is_malformed() {
    let err = set_path(&doc(r#"{"a":[1]}"#), &path(&["a", "x"]), &Jsonb::from(2), false)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed path: path element at position 2 is not an integer: \"x\""
    );
}

#[test]
fn oversized_array_index_is_a_range_error() {
    let err = set_path(&doc("[1]"), &path(&["99999999999"]), &Jsonb::from(2), false).unwrap_err();
    assert!(matches!(err, JsonbError::Range(_)));
}

#[test]
fn non_delete_without_value_is_invalid() {
    let err = apply_path(&doc("[1]"), &path(&["0"]), None, PathOp::insert(true)).unwrap_err();
    assert!(matches!(err, JsonbError::InvalidArgument(_)));
}
