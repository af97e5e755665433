//! Tests for merge behavior when resolving declarations loaded from disk.

use serde_json::json;
use std::fs;
use strata_config::{ConfigDiscovery, ConfigError, Mode, Node};
use tempfile::TempDir;

fn load(toml: &str) -> strata_config::ConfigSet {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("strata.toml"), toml).expect("write declaration");
    ConfigDiscovery::new(dir.path())
        .load()
        .expect("load declaration")
}

#[test]
fn merge_replaces_scalar_values() {
    let set = load(
        r#"
[base]
minify = false
port = 5001

[production]
minify = true
port = 80
"#,
    );

    let prod = set.resolve(Mode::Production);
    assert_eq!(prod.get("minify").and_then(Node::as_bool), Some(true));
    assert_eq!(prod.get("port").and_then(Node::as_i64), Some(80));
}

#[test]
fn merge_preserves_unspecified_fields() {
    let set = load(
        r#"
[base]
entry = ["src/js/init.js"]
minify = false

[base.output]
publicPath = "/"
path = "dist"

[production.output]
filename = "js/[name]-[hash].js"
"#,
    );

    let prod = set.resolve(Mode::Production).to_value();
    assert_eq!(prod["entry"], json!(["src/js/init.js"]));
    assert_eq!(prod["minify"], json!(false));
    assert_eq!(
        prod["output"],
        json!({ "publicPath": "/", "path": "dist", "filename": "js/[name]-[hash].js" })
    );
}

#[test]
fn merge_concatenates_sequences() {
    let set = load(
        r#"
[base]
entry = ["x"]

[development]
entry = ["y", "z"]
"#,
    );

    assert_eq!(
        set.resolve(Mode::Development).to_value(),
        json!({ "entry": ["x", "y", "z"] })
    );
}

#[test]
fn merge_appends_plugins_in_declaration_order() {
    let set = load(
        r#"
[[base.plugins]]
"$opaque" = "webpack-notifier"

[[base.plugins]]
"$opaque" = "html-webpack-plugin"
options = { template = "src/index.html", inject = "body" }

[[production.plugins]]
"$opaque" = "extract-text-webpack-plugin"
options = { filename = "css/[name]-[hash].css" }
"#,
    );

    let prod = set.resolve(Mode::Production);
    let kinds: Vec<&str> = prod
        .get("plugins")
        .and_then(Node::as_sequence)
        .expect("plugins")
        .iter()
        .map(|plugin| plugin.as_opaque().expect("opaque").kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "webpack-notifier",
            "html-webpack-plugin",
            "extract-text-webpack-plugin"
        ]
    );

    let dev = set.resolve(Mode::Development);
    assert_eq!(dev.get("plugins").and_then(Node::as_sequence).map(<[Node]>::len), Some(2));
}

#[test]
fn merge_handles_nested_tables() {
    let set = load(
        r#"
[base.devServer]
historyApiFallback = true
contentBase = "./src"
hot = false
port = 5001

[development.devServer]
hot = true
"#,
    );

    assert_eq!(
        set.resolve(Mode::Development).to_value(),
        json!({
            "devServer": {
                "historyApiFallback": true,
                "contentBase": "./src",
                "hot": true,
                "port": 5001
            }
        })
    );
}

#[test]
fn merge_replaces_on_kind_mismatch() {
    let set = load(
        r#"
[base]
entry = ["webpack-dev-server/client", "src/js/init.js"]

[production]
entry = "src/js/init.js"
"#,
    );

    assert_eq!(
        set.resolve(Mode::Production).get("entry").and_then(Node::as_str),
        Some("src/js/init.js")
    );
}

#[test]
fn merge_handles_empty_overlay() {
    let set = load(
        r#"
[base]
minify = true

[production]
"#,
    );

    assert_eq!(
        set.resolve(Mode::Production).to_value(),
        set.resolve(Mode::Development).to_value()
    );
}

#[test]
fn merge_rules_by_test_pattern_when_configured() {
    let set = load(
        r#"
[merge.sequences]
"module.rules" = { match_by = "test" }
"module.rules.use" = "prepend"

[[base.module.rules]]
test = '\.elm$'
exclude = ["elm-stuff", "node_modules"]
use = ["elm-webpack-loader"]

[[development.module.rules]]
test = '\.elm$'
use = ["elm-hot-loader"]
"#,
    );

    assert_eq!(
        set.resolve(Mode::Development).to_value()["module"]["rules"],
        json!([{
            "test": "\\.elm$",
            "exclude": ["elm-stuff", "node_modules"],
            "use": ["elm-hot-loader", "elm-webpack-loader"]
        }])
    );
}

#[test]
fn merge_without_policy_duplicates_rules() {
    let set = load(
        r#"
[[base.module.rules]]
test = '\.elm$'
use = ["elm-webpack-loader"]

[[production.module.rules]]
test = '\.elm$'
use = ["elm-webpack-loader"]
"#,
    );

    let prod = set.resolve(Mode::Production);
    assert_eq!(
        prod.get("module.rules").and_then(Node::as_sequence).map(<[Node]>::len),
        Some(2)
    );
}

#[test]
fn reference_cycle_fails_loading() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("strata.toml"),
        r##"
[base.output]
self = { "$ref" = "#/base/output" }
"##,
    )
    .expect("write declaration");

    let err = ConfigDiscovery::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::MalformedFragment { .. }));
}
