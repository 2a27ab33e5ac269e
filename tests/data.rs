//! Key/value data across chains of annotated errors.
//!
//! The fixtures build the following chain:
//!
//! - `e`: a bare node holding `{magic:144, charm:quark, dessert:quark belchen,
//!   lonely:1}`
//! - `e2`: `e` wrapped with a message and `{charm:bracelet, lonely:0, moon:io}`
//! - `e3`: a fresh error holding `{dessert:blueberry3.14, joke:...}`
//! - `e4`: `join(e2, e3)` wrapped with a message

use errnote::{Annotated, KvPairs, Value, errorf, join, kv, new, wrap, wrap_with_data};

const JOKE: &str = "A man visits Chuck Norris and sees an aquarium with a mantis shrimp. \
He says to Chuck, \"I didn't know you have a pet!\"\n To which the shrimp replies, \
\"What's it to ya? I can have any pet I want!\"";

fn fixture_e() -> Annotated {
    let mut e = Annotated::empty();
    e.set_data(kv! {
        "magic" => 144,
        "charm" => "quark",
        "dessert" => "quark belchen",
        "lonely" => 1,
    });
    e
}

fn fixture_e2() -> Annotated {
    wrap_with_data(
        fixture_e(),
        "wrap blank error 'cause it's embarassing",
        kv! { "charm" => "bracelet", "lonely" => 0, "moon" => "io" },
    )
}

fn fixture_e4() -> Annotated {
    let e2 = fixture_e2();
    let e3 = errorf!("I'm the younger brother of {:#}", e2)
        .and_data(kv! { "dessert" => "blueberry3.14", "joke" => JOKE });
    let joined = join([e2, e3]).expect("two members");
    wrap(joined, "multiple errors")
}

fn int(value: Option<&Value>) -> Option<i32> {
    value.and_then(|v| v.downcast_ref::<i32>()).copied()
}

fn text(value: Option<&Value>) -> Option<&'static str> {
    value.and_then(|v| v.downcast_ref::<&'static str>()).copied()
}

#[test]
fn test_set_key_val_sequence() {
    #[derive(Debug, PartialEq)]
    struct Pair {
        a: bool,
        b: i32,
    }

    let mut e = Annotated::empty();
    let err = e
        .set_key_val("_reserved", "this should fail")
        .expect_err("reserved key");
    assert_eq!(
        err.to_string(),
        "cannot use a reserved key (string starting with '_')"
    );
    assert!(e.data().is_none_or(KvPairs::is_empty));

    e.set_key_val("string", "I'm a string").expect("valid key");
    e.set_key_val("int", 100).expect("valid key");
    e.set_key_val("struct", Pair { a: true, b: -5 }).expect("valid key");
    e.set_key_val("int", 200).expect("valid key");

    let data = e.data().expect("data was set");
    assert_eq!(data.keys().collect::<Vec<_>>(), ["string", "int", "struct"]);
    assert_eq!(int(data.get("int")), Some(200));
    assert_eq!(
        data.get("struct").and_then(|v| v.downcast_ref::<Pair>()),
        Some(&Pair { a: true, b: -5 })
    );
}

#[test]
fn test_set_data_sequence() {
    let mut e = Annotated::empty();

    e.set_data(KvPairs::new());
    assert!(e.get_all_data().is_empty());

    e.set_data(kv! { "number" => 72 });
    e.set_data(kv! { "greet" => "Welcome to testing" });
    e.set_data(kv! {
        "number" => 144,
        "pi" => 1.5,
        "popcorn" => (1970, 1, 1),
        "_special" => "reserved",
    });

    let data = e.data().expect("data was set");
    assert!(!data.contains_key("_special"));
    assert_eq!(data.len(), 4);
    assert_eq!(int(data.get("number")), Some(144));
    assert_eq!(text(data.get("greet")), Some("Welcome to testing"));
    assert_eq!(
        data.to_string(),
        "{number:144, greet:Welcome to testing, pi:1.5, popcorn:(1970, 1, 1)}"
    );
}

#[test]
fn test_get_value() {
    let (e, e2, e4) = (fixture_e(), fixture_e2(), fixture_e4());

    assert!(Annotated::empty().get_value("none").is_none());
    assert!(e.get_value("none").is_none());
    assert!(e2.get_value("_msg").is_none());
    assert_eq!(int(e.get_value("magic")), Some(144));
    assert_eq!(int(e.get_value("lonely")), Some(1));

    // The outer node is searched before its cause.
    assert_eq!(int(e2.get_value("lonely")), Some(0));
    assert_eq!(text(e2.get_value("moon")), Some("io"));
    assert_eq!(text(e2.get_value("dessert")), Some("quark belchen"));

    // Joined members are searched in order, each one depth-first.
    assert_eq!(int(e4.get_value("magic")), Some(144));
    assert_eq!(text(e4.get_value("dessert")), Some("quark belchen"));
    assert_eq!(text(e4.get_value("joke")), Some(JOKE));
}

#[test]
fn test_get_all_data() {
    assert!(Annotated::empty().get_all_data().is_empty());
    assert!(Annotated::empty().and_data(KvPairs::new()).get_all_data().is_empty());
    assert!(new("the sky is falling").get_all_data().is_empty());

    assert_eq!(
        fixture_e().get_all_data().to_string(),
        "{magic:144, charm:quark, dessert:quark belchen, lonely:1}"
    );

    let data = fixture_e4().get_all_data();
    assert_eq!(data.len(), 6);
    assert_eq!(int(data.get("magic")), Some(144));
    assert_eq!(text(data.get("charm")), Some("bracelet"));
    assert_eq!(int(data.get("lonely")), Some(0));
    assert_eq!(text(data.get("moon")), Some("io"));
    assert_eq!(text(data.get("joke")), Some(JOKE));
    // The later join member wins.
    assert_eq!(text(data.get("dessert")), Some("blueberry3.14"));
}

#[test]
fn test_shallowest_wins() {
    let c = new("c").and_data(kv! { "k" => "c" });
    let b = wrap_with_data(c, "b", kv! { "k" => "b" });
    let a = wrap_with_data(b, "a", kv! { "k" => "a" });
    assert_eq!(text(a.get_all_data().get("k")), Some("a"));
    assert_eq!(text(a.get_value("k")), Some("a"));
}

#[test]
fn test_wrapper_wins_over_join() {
    let x = new("x").and_data(kv! { "k" => "x" });
    let y = new("y").and_data(kv! { "k" => "y" });
    let joined = wrap(join([x, y]).expect("two members"), "msg");
    assert_eq!(text(joined.get_all_data().get("k")), Some("y"));

    let x = new("x").and_data(kv! { "k" => "x" });
    let y = new("y").and_data(kv! { "k" => "y" });
    let wrapper = wrap_with_data(join([x, y]).expect("two members"), "msg", kv! { "k" => "w" });
    assert_eq!(text(wrapper.get_all_data().get("k")), Some("w"));
}

#[test]
fn test_message_formatting_of_fixture() {
    let e4 = fixture_e4();
    assert_eq!(
        e4.to_string(),
        "multiple errors: wrap blank error 'cause it's embarassing: \n\
         I'm the younger brother of wrap blank error 'cause it's embarassing"
    );
    assert_eq!(format!("{e4:#}"), "multiple errors");
}
