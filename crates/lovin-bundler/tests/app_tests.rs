//! End-to-end builds of small apps.

mod helpers;

use helpers::{Workspace, md5_hex};
use lovin_bundler::{
    Builder, CssPreprocessor, Error, JsMinifier, JsMinifyOptions, JsOutput, JsSource, Toolchain,
    build_app, build_app_css, build_app_js,
};
use serde_json::json;
use std::path::Path;

#[test]
fn unminified_stylesheet_is_written_verbatim() {
    let ws = Workspace::new();
    let app = ws.app("myapp");
    ws.write("myapp/config.yml", "minify: false\n");
    ws.write("myapp/styles/main.css", "body { color: red; }\n");

    let out = build_app_css(&app, &ws.options()).unwrap();

    let expected = format!("myapp-main-{}.css", md5_hex("body { color: red; }\n"));
    assert_eq!(out.filenames(), [expected.as_str()]);
    assert_eq!(ws.read_output(&expected), "body { color: red; }\n");
    assert_eq!(ws.manifest_json(), json!({ "myapp-main.css": [expected] }));
}

#[test]
fn app_without_styles_or_templates_still_builds_js() {
    let ws = Workspace::new();
    let app = ws.app("myapp");
    ws.write("myapp/config.json", r#"{ "vendor": {} }"#);
    ws.write("myapp/app.js", "start();");
    ws.write("myapp/lib/util.js", "util();");

    let build = build_app(&app, &ws.options()).unwrap();

    assert!(build.css.is_empty());
    assert_eq!(build.js.artifacts.len(), 1);
    let bundle = &build.js.artifacts[0];
    assert_eq!(bundle.target, "myapp.js");
    assert_eq!(ws.read_output(&bundle.filename), "start();\nutil();\n");

    let manifest = ws.manifest_json();
    assert_eq!(manifest, json!({ "myapp.js": [bundle.filename.clone()] }));
}

#[test]
fn identical_inputs_give_identical_names() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("shop/main.js", "go();");
    ws.write("shop/styles/site.css", "a{}");
    ws.write("shop/templates/home.hbs", "<p>home</p>");

    let first = build_app(&app, &ws.options()).unwrap();
    let second = build_app(&app, &ws.options()).unwrap();

    let names = |b: &lovin_bundler::AppBuild| -> Vec<String> {
        b.artifacts().map(|a| a.filename.clone()).collect()
    };
    assert_eq!(names(&first), names(&second));

    // Rebuilding the same content leaves each history at one entry.
    let manifest = ws.manifest_json();
    assert_eq!(manifest["shop.js"].as_array().unwrap().len(), 1);
    assert_eq!(manifest["shop-site.css"].as_array().unwrap().len(), 1);
}

#[test]
fn changed_content_keeps_previous_build() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    let script = ws.write("shop/main.js", "v1();");

    let v1 = build_app_js(&app, &ws.options()).unwrap();
    std::fs::write(&script, "v2();").unwrap();
    let v2 = build_app_js(&app, &ws.options()).unwrap();
    std::fs::write(&script, "v3();").unwrap();
    let v3 = build_app_js(&app, &ws.options()).unwrap();

    let manifest = ws.manifest_json();
    assert_eq!(
        manifest["shop.js"],
        json!([v3.filenames()[0], v2.filenames()[0]])
    );
    // Old bundles are never deleted.
    assert!(ws.output().join(v1.filenames()[0]).exists());
}

#[test]
fn vendor_files_lead_in_declared_order() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("vendor/a.js", "A;");
    ws.write("vendor/b.js", "B;");
    ws.write(
        "shop/config.yml",
        "vendor:\n  first: vendor/a.js\n  second: vendor/b.js\n",
    );
    ws.write("shop/templates/index.hbs", "hi");
    ws.write("shop/main.js", "main();");

    let js = build_app_js(&app, &ws.options()).unwrap();
    let bundle = ws.read_output(&js.filenames()[0]);

    let a = bundle.find("A;").unwrap();
    let b = bundle.find("B;").unwrap();
    let templates = bundle.find("Ember.TEMPLATES[\"index\"]").unwrap();
    let main = bundle.find("main();").unwrap();
    assert!(a < b && b < templates && templates < main, "{}", bundle);
}

#[test]
fn shared_config_supplies_vendor_and_app_overrides() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("vendor/jquery.js", "JQ;");
    ws.write("vendor/jquery.min.js", "JQMIN;");
    ws.write("vendor/lodash.js", "LD;");
    ws.write(
        "config.yml",
        "vendor:\n  jquery: vendor/jquery.js\n  lodash: vendor/lodash.js\n",
    );
    ws.write("shop/config.yml", "vendor:\n  jquery: vendor/jquery.min.js\n");
    ws.write("shop/main.js", "main();");

    let js = build_app_js(&app, &ws.options()).unwrap();
    let bundle = ws.read_output(&js.filenames()[0]);

    assert_eq!(bundle, "JQMIN;\nLD;\nmain();\n");
}

#[test]
fn default_vendor_false_skips_vendor_files() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("vendor/a.js", "A;");
    ws.write("config.yml", "vendor:\n  a: vendor/a.js\n");
    ws.write("shop/config.yml", "defaultVendor: false\n");
    ws.write("shop/main.js", "main();");

    let js = build_app_js(&app, &ws.options()).unwrap();
    assert_eq!(ws.read_output(&js.filenames()[0]), "main();\n");
}

#[test]
fn debug_builds_use_vendor_debug() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("vendor/a.min.js", "MIN;");
    ws.write("vendor/a.js", "FULL;");
    ws.write(
        "config.yml",
        "vendor:\n  a: vendor/a.min.js\nvendorDebug:\n  a: vendor/a.js\n",
    );
    ws.write("shop/main.js", "main();");

    let release = build_app_js(&app, &ws.options()).unwrap();
    let debug = build_app_js(&app, &ws.options().debug(true)).unwrap();

    assert!(ws.read_output(&release.filenames()[0]).starts_with("MIN;"));
    assert!(ws.read_output(&debug.filenames()[0]).starts_with("FULL;"));
}

#[test]
fn source_maps_are_recorded_under_their_own_target() {
    struct WithMap;

    impl JsMinifier for WithMap {
        fn name(&self) -> &str {
            "with-map"
        }

        fn minify(&self, sources: &[JsSource], options: &JsMinifyOptions) -> anyhow::Result<JsOutput> {
            Ok(JsOutput {
                code: sources.iter().map(|s| s.code.as_str()).collect(),
                map: options.source_map.clone().map(|file| format!("{{\"file\":\"{}\"}}", file)),
            })
        }
    }

    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("shop/config.yml", "srcmaps: true\n");
    ws.write("shop/main.js", "main();");

    let builder = Builder::new(Toolchain::passthrough().with_js_minifier(WithMap));
    let js = builder.build_app_js(&app, &ws.options()).unwrap();

    assert_eq!(js.artifacts.len(), 2);
    let bundle = js.get("shop.js").unwrap();
    let map = js.get("shop.js.map.js").unwrap();
    assert_eq!(map.filename, format!("{}.map.js", bundle.filename));

    let manifest = ws.manifest_json();
    assert_eq!(manifest["shop.js.map.js"], json!([map.filename.clone()]));
}

#[test]
fn preprocessor_failure_aborts_css_stage() {
    struct Rejecting;

    impl CssPreprocessor for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        fn preprocess(&self, _source: &str, _path: &Path, _base_dir: &Path) -> anyhow::Result<String> {
            anyhow::bail!("unbalanced braces")
        }
    }

    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("shop/styles/main.css", "a {");
    ws.write("shop/main.js", "main();");

    let builder = Builder::new(Toolchain::passthrough().with_css_preprocessor(Rejecting));
    let err = builder.build_app(&app, &ws.options()).unwrap_err();

    match err {
        Error::Tool { tool, path, message } => {
            assert_eq!(tool, "rejecting");
            assert!(path.ends_with("styles/main.css"));
            assert!(message.contains("unbalanced braces"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Fail-fast: the JS stage never ran.
    assert!(ws.output_files().is_empty());
}

#[test]
fn js_failure_leaves_css_output_in_place() {
    struct Broken;

    impl JsMinifier for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn minify(&self, _sources: &[JsSource], _options: &JsMinifyOptions) -> anyhow::Result<JsOutput> {
            anyhow::bail!("parse error")
        }
    }

    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("shop/styles/main.css", "a{}");
    ws.write("shop/main.js", "main(");

    let builder = Builder::new(Toolchain::passthrough().with_js_minifier(Broken));
    assert!(matches!(
        builder.build_app(&app, &ws.options()),
        Err(Error::Tool { .. })
    ));

    let manifest = ws.manifest_json();
    assert!(manifest.get("shop-main.css").is_some());
    assert!(manifest.get("shop.js").is_none());
}

#[test]
fn malformed_config_is_an_error() {
    let ws = Workspace::new();
    let app = ws.app("shop");
    ws.write("shop/config.yml", "vendor: [unclosed\n");
    ws.write("shop/main.js", "main();");

    assert!(matches!(
        build_app_js(&app, &ws.options()),
        Err(Error::Config(_))
    ));
}

#[test]
fn missing_app_directory_is_not_found() {
    let ws = Workspace::new();
    let err = build_app_js(ws.root().join("nope"), &ws.options()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
