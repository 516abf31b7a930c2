//! End-to-end tests of `transform` over small inputs, one feature at a time.

use pretty_assertions::assert_eq;
use rinse_transformer::{transform, Options, TransformError, Transforms};

fn run(code: &str, transforms: Transforms) -> String {
    transform(code, &Options::new(transforms)).unwrap().code
}

fn run_with(code: &str, options: Options) -> String {
    transform(code, &options).unwrap().code
}

// ============================================================================
// PLAIN JAVASCRIPT
// ============================================================================

#[test]
fn test_plain_js_is_unchanged() {
    let code = "// leading comment\nfunction add(a, b) {\n  return a  +  b; /* keep */\n}\n\nadd(1, 2);\n";
    assert_eq!(run(code, Transforms::empty()), code);
    assert_eq!(run(code, Transforms::JSX | Transforms::TYPESCRIPT), code);
}

#[test]
fn test_hashbang_stays_first() {
    let code = "#!/usr/bin/env node\nimport a from 'a';\na();";
    let output = run(code, Transforms::IMPORTS);
    assert!(output.starts_with("#!/usr/bin/env node\n\"use strict\";"), "{output}");
    assert!(output.ends_with("\n_a2.default.call(void 0, );"), "{output}");
}

// ============================================================================
// TYPES
// ============================================================================

#[test]
fn test_arrow_types_are_stripped() {
    assert_eq!(
        run("const f = (a: number): number => a + 1;", Transforms::TYPESCRIPT),
        "const f = (a) => a + 1;"
    );
}

#[test]
fn test_type_declarations_keep_their_lines() {
    let code = "let x: number = 1;\ninterface I {\n  a: string;\n}\nx;";
    assert_eq!(run(code, Transforms::TYPESCRIPT), "let x = 1;\n\n\n\nx;");
}

#[test]
fn test_flow_annotations_are_stripped() {
    assert_eq!(
        run("function f(x: number): string { return ''; }", Transforms::FLOW),
        "function f(x) { return ''; }"
    );
}

#[test]
fn test_type_only_imports_are_elided_in_esm() {
    let code = "import {T} from './t';\nimport {v} from './v';\nlet x: T = v;";
    assert_eq!(
        run(code, Transforms::TYPESCRIPT),
        "\nimport {v} from './v';\nlet x = v;"
    );
}

#[test]
fn test_type_only_imports_are_elided_in_cjs() {
    let code = "import {T} from './t';\nimport {v} from './v';\nlet x: T = v;";
    assert_eq!(
        run(code, Transforms::TYPESCRIPT | Transforms::IMPORTS),
        "\"use strict\";\nvar _v = require('./v');\nlet x = _v.v;"
    );
}

// ============================================================================
// ENUMS
// ============================================================================

#[test]
fn test_enum_members_count_up() {
    insta::assert_snapshot!(
        run("enum E { A, B, C }", Transforms::TYPESCRIPT),
        @r#"var E; (function (E) { const A = 0; E[E["A"] = A] = "A"; const B = A + 1; E[E["B"] = B] = "B"; const C = B + 1; E[E["C"] = C] = "C"; })(E || (E = {}));"#
    );
}

#[test]
fn test_enum_member_after_initializer_counts_from_it() {
    let output = run("enum E { A = 5, B }", Transforms::TYPESCRIPT);
    assert!(output.contains("const A = 5; E[E[\"A\"] = A] = \"A\";"), "{output}");
    assert!(output.contains("const B = A + 1; E[E[\"B\"] = B] = \"B\";"), "{output}");
}

#[test]
fn test_enum_string_member_has_no_reverse_mapping() {
    insta::assert_snapshot!(
        run("enum S { A = \"a\" }", Transforms::TYPESCRIPT),
        @r#"var S; (function (S) { const A = "a"; S["A"] = A; })(S || (S = {}));"#
    );
}

#[test]
fn test_enum_implicit_member_after_string_is_rejected() {
    let options = Options {
        file_path: Some("e.ts".to_string()),
        ..Options::new(Transforms::TYPESCRIPT)
    };
    let error = transform("enum E { A = 5, B, C = \"x\", D }", &options).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Error transforming e.ts: Enum member must have initializer."
    );
    assert!(matches!(error.root_cause(), TransformError::Structure { .. }));
}

// ============================================================================
// IMPORTS AND EXPORTS
// ============================================================================

#[test]
fn test_named_import_becomes_property_access() {
    assert_eq!(
        run("import {x} from 'a'; console.log(x);", Transforms::IMPORTS),
        "\"use strict\";var _a = require('a'); console.log(_a.x);"
    );
}

#[test]
fn test_exported_const_is_assigned_to_exports() {
    assert_eq!(
        run("export const a = 1;", Transforms::IMPORTS),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); const a = 1; exports.a = a;"
    );
}

#[test]
fn test_exported_function_is_assigned_after_declaration() {
    assert_eq!(
        run("export function f() {}", Transforms::IMPORTS),
        "\"use strict\";Object.defineProperty(exports, \"__esModule\", {value: true}); function f() {} exports.f = f;"
    );
}

#[test]
fn test_exported_import_equals_is_kept() {
    assert_eq!(
        run("export import x = require('y');", Transforms::TYPESCRIPT),
        "export const x = require('y');"
    );
}

#[test]
fn test_mixed_type_and_value_specifiers_in_esm() {
    let code = "import { type A, B } from 'm';\nlet x: A = B;";
    let output = run(code, Transforms::TYPESCRIPT);
    assert!(output.contains("B } from 'm';"), "{output}");
    assert!(!output.contains('A'), "{output}");
    assert!(output.ends_with("\nlet x = B;"), "{output}");
}

#[test]
fn test_mixed_type_and_value_specifiers_in_cjs() {
    let code = "import { type A, B } from 'm';\nlet x: A = B;";
    let output = run(code, Transforms::TYPESCRIPT | Transforms::IMPORTS);
    assert!(output.contains("var _m = require('m');"), "{output}");
    assert!(!output.contains('A'), "{output}");
    assert!(output.ends_with("\nlet x = _m.B;"), "{output}");
}

#[test]
fn test_shadowed_import_is_not_rewritten() {
    assert_eq!(
        run("import {x} from 'a'; function f(x) { return x; } x;", Transforms::IMPORTS),
        "\"use strict\";var _a = require('a'); function f(x) { return x; } _a.x;"
    );
}

#[test]
fn test_dynamic_import_can_be_preserved() {
    let options = Options {
        preserve_dynamic_import: true,
        ..Options::new(Transforms::IMPORTS)
    };
    assert_eq!(run_with("import('a');", options), "\"use strict\";import('a');");
}

#[test]
fn test_esm_keeps_module_syntax() {
    let code = "import a from 'a';\nexport default a;";
    assert_eq!(run(code, Transforms::empty()), code);
}

// ============================================================================
// JSX
// ============================================================================

#[test]
fn test_jsx_element_in_production() {
    let options = Options {
        production: true,
        ..Options::new(Transforms::JSX)
    };
    assert_eq!(
        run_with("<div className=\"a\">{x}</div>", options),
        "React.createElement('div', { className: \"a\",}, x)"
    );
}

#[test]
fn test_jsx_element_with_dev_metadata() {
    let options = Options {
        file_path: Some("App.jsx".to_string()),
        ..Options::new(Transforms::JSX)
    };
    insta::assert_snapshot!(
        run_with("<div className=\"a\">{x}</div>", options),
        @r#"const _jsxFileName = "App.jsx";React.createElement('div', { className: "a", __self: this, __source: {fileName: _jsxFileName, lineNumber: 1}}, x)"#
    );
}

#[test]
fn test_jsx_custom_pragma_and_fragment() {
    let options = Options {
        production: true,
        jsx_pragma: Some("h".to_string()),
        jsx_fragment_pragma: Some("Fragment".to_string()),
        ..Options::new(Transforms::JSX)
    };
    assert_eq!(
        run_with("<><Foo /></>", options),
        "h(Fragment, null, h(Foo, null ))"
    );
}

#[test]
fn test_jsx_namespaced_tag_is_an_intrinsic_string() {
    let options = Options {
        production: true,
        ..Options::new(Transforms::JSX)
    };
    assert_eq!(
        run_with("<svg:circle cx=\"1\"/>", options),
        "React.createElement('svg:circle', { cx: \"1\",})"
    );
}

#[test]
fn test_jsx_namespaced_attribute_is_quoted() {
    let options = Options {
        production: true,
        ..Options::new(Transforms::JSX)
    };
    assert_eq!(
        run_with("<a xlink:href=\"x\" title=\"t\"/>", options),
        "React.createElement('a', { 'xlink:href': \"x\", title: \"t\",})"
    );
}

#[test]
fn test_jsx_text_is_trimmed() {
    let options = Options {
        production: true,
        ..Options::new(Transforms::JSX)
    };
    assert_eq!(
        run_with("<p>\n  Hello &amp;\n  bye\n</p>", options),
        "React.createElement('p', null, \"Hello & bye\"\n\n\n)"
    );
}

// ============================================================================
// ES TRANSFORMS
// ============================================================================

#[test]
fn test_optional_chain_is_lowered() {
    let output = run("a?.b;", Transforms::empty());
    assert!(output.ends_with("_optionalChain([a, 'optionalAccess', _ => _.b]);"), "{output}");
}

#[test]
fn test_nullish_coalescing_is_lowered() {
    let output = run("a ?? b;", Transforms::empty());
    assert!(output.ends_with("_nullishCoalesce(a, () => ( b));"), "{output}");
}

#[test]
fn test_optional_call_continues_the_chain() {
    let output = run("a?.b?.();", Transforms::empty());
    assert!(
        output.ends_with("_optionalChain([a, 'optionalAccess', _ => _.b, 'optionalCall', _2 => _2()]);"),
        "{output}"
    );
}

#[test]
fn test_await_inside_chain_uses_async_helpers() {
    let output = run("async function f() { return a?.[await b]; }", Transforms::empty());
    assert!(
        output.contains("return await _asyncOptionalChain([a, 'optionalAccess', async _ => _[await b]]);"),
        "{output}"
    );
    assert!(output.contains("async function _asyncOptionalChain("), "{output}");

    let output = run("async function f() { return (await a) ?? b; }", Transforms::empty());
    assert!(
        output.contains("return await _asyncNullishCoalesce((await a), async () => ( b));"),
        "{output}"
    );
}

#[test]
fn test_es_transforms_can_be_disabled() {
    let options = Options {
        disable_es_transforms: true,
        ..Options::default()
    };
    let code = "a?.b ?? 1_000; try {} catch {}";
    assert_eq!(run_with(code, options), code);
}

#[test]
fn test_numeric_separators_are_removed() {
    assert_eq!(run("let n = 1_000_000;", Transforms::empty()), "let n = 1000000;");
}

#[test]
fn test_optional_catch_binding_gets_a_name() {
    assert_eq!(
        run("try { a(); } catch { b(); }", Transforms::empty()),
        "try { a(); } catch (e) { b(); }"
    );
}

#[test]
fn test_class_fields_move_into_constructor() {
    let output = run("class A { x = 1; }", Transforms::empty());
    assert!(output.contains("constructor() { A.prototype.__init.call(this); }"), "{output}");
    assert!(output.contains("__init() {this.x = 1"), "{output}");
}

#[test]
fn test_subclass_fields_get_a_forwarding_constructor() {
    let output = run("class A extends B { x = 1; }", Transforms::empty());
    assert!(
        output.contains("constructor(...args) { super(...args); A.prototype.__init.call(this); }"),
        "{output}"
    );
}

#[test]
fn test_field_initializers_follow_explicit_super_call() {
    let output = run(
        "class A extends B { x = 1; constructor() { super(); f(); } }",
        Transforms::empty(),
    );
    assert!(output.contains("super();A.prototype.__init.call(this);; f();"), "{output}");
    assert!(!output.contains("...args"), "{output}");
}

#[test]
fn test_parameter_properties_are_assigned_in_constructor() {
    let output = run("class A { constructor(private a: string) {} }", Transforms::TYPESCRIPT);
    assert!(output.contains("{;this.a = a;}"), "{output}");
    assert!(!output.contains("private"), "{output}");
    assert!(!output.contains("string"), "{output}");
}

// ============================================================================
// REACT AND JEST
// ============================================================================

#[test]
fn test_display_name_from_variable() {
    assert_eq!(
        run("const Foo = createReactClass({render() {}});", Transforms::JSX),
        "const Foo = createReactClass({displayName: 'Foo',render() {}});"
    );
}

#[test]
fn test_jest_mock_is_hoisted() {
    assert_eq!(
        run("import {a} from 'a';\njest.mock('a');", Transforms::IMPORTS | Transforms::JEST),
        "\"use strict\";__jestHoist();var _a = require('a');\nfunction __jestHoist(){jest.mock('a');};"
    );
}

#[test]
fn test_hot_loader_requires_file_path() {
    let error = transform("let a;", &Options::new(Transforms::JSX | Transforms::REACT_HOT_LOADER)).unwrap_err();
    assert_eq!(
        error.to_string(),
        "filePath is required when using the react-hot-loader transform."
    );
}
