//! Parses a spread of realistic inputs per dialect and checks that valid
//! code parses cleanly and that type-only tokens are the ones marked.

use pretty_assertions::assert_eq;
use rinse_parser::{parse_file, Dialect, IdentifierRole, TokenType};

const JS: &[&str] = &[
    "for (let i = 0, n = a.length; i < n; i++) { if (a[i]) continue; }",
    "for (const [k, v] of Object.entries(o)) console.log(k, v);",
    "for await (const chunk of stream) total += chunk.length;",
    "label: while (true) { break label; }",
    "switch (x) { case 1: case 2: y(); break; default: z(); }",
    "try { f(); } catch { g(); } finally { h(); }",
    "const {a, b: [c = 1, ...d], ...e} = obj;",
    "async function* gen() { yield* other(); await x; }",
    "const f = async (a, {b}) => { return a ?? b?.c?.[d]?.(e); };",
    "x ??= y; x ||= 1; x &&= 2; x **= 3;",
    "class A extends B { #x = 1; static y; static { init(); } get z() { return this.#x; } }",
    "const re = /ab+c/gi.test(s) ? `a${b}c${`nested${d}`}` : 1_000_000n;",
    "export default class extends Base {}",
    "export * as ns from 'mod'; export { a as b, c as default } from 'other';",
    "import def, * as ns from 'a'; import { x as y } from 'b' with { type: 'json' };",
    "let obj = { async *[key]() {}, get a() { return 1; }, set a(v) {}, b, 'c': 2 };",
    "new.target; import.meta.url; const m = await import('./m.js');",
    "a\n++b",
    "if (a) b(); else if (c) d(); else {}",
    "do x++; while (x < 10)",
];

const TS: &[&str] = &[
    "abstract class A<T extends object = {}> implements I, J<T> { private readonly x?: T; protected abstract m(): void; constructor(public a: string) { super(); } }",
    "function f<T>(this: Window, a?: number, ...rest: T[]): asserts a is number {}",
    "type Mapped<T> = { readonly [K in keyof T]?: T[K] extends infer U ? U : never };",
    "type Tpl = `prefix-${string}`; type Tup = [a: string, b?: number, ...rest: boolean[]];",
    "let v = <const>['a']; let w = x as unknown as Y; let s = y satisfies Z;",
    "declare module 'm' { export function f(): void; }",
    "declare global { interface Window { x: number } }",
    "export declare const enum E { A = 1 }",
    "export abstract class C {}",
    "const f = async <T,>(x: T): Promise<T> => x;",
    "a = b < c > (d);",
    "let x: typeof import('./mod').default;",
    "export type { A } from './a'; import type B from './b';",
    "class C { declare x: number; override m() {} accessor y = 1; }",
    "function g(x: unknown): x is string { return typeof x === 'string'; }",
    "let u: A | B & C, fn: new (...args: any[]) => object;",
    "namespace Types { export type T = string; }",
    "export = foo;",
    "import fs = require('fs');",
    "enum Color { Red, Green = 'g', Blue = Red | 4 }",
];

const FLOW: &[&str] = &[
    "function f(x: ?string = 'a', ...rest: Array<number>): Promise<void> {}",
    "type O = { +readOnly: string, -writeOnly: number, [key: string]: mixed, ... };",
    "declare export function f(x: number): string;",
    "declare module.exports: { foo: string };",
    "class A<+T> extends B<T> implements I { prop: T; static s: number = 1; }",
    "import typeof TheType from './t'; import { typeof x, type y } from './u';",
    "export type * from './types';",
    "const x = (y: any);",
    "let fn: (string, number) => void = () => {};",
    "type Fn = (x: number) => ?(string | void);",
];

fn assert_parses(sources: &[&str], dialect: Dialect) {
    for source in sources {
        if let Err(error) = parse_file(source, dialect) {
            panic!("failed to parse {source:?}: {error}");
        }
    }
}

fn value_text(source: &str, dialect: Dialect) -> String {
    let file = parse_file(source, dialect).unwrap();
    file.tokens
        .iter()
        .filter(|token| !token.is_type && token.kind != TokenType::Eof)
        .map(|token| token.text(source))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_parse_javascript_corpus() {
    assert_parses(JS, Dialect::default());
}

#[test]
fn test_parse_typescript_corpus() {
    assert_parses(
        TS,
        Dialect {
            typescript: true,
            ..Dialect::default()
        },
    );
}

#[test]
fn test_parse_flow_corpus() {
    assert_parses(
        FLOW,
        Dialect {
            flow: true,
            ..Dialect::default()
        },
    );
}

#[test]
fn test_parse_tsx() {
    let dialect = Dialect {
        jsx: true,
        typescript: true,
        ..Dialect::default()
    };
    insta::assert_snapshot!(
        value_text("const el = <Foo<string> a={1} {...rest} />;", dialect),
        @"const el = < Foo a = { 1 } { ... rest } / > ;"
    );
}

#[test]
fn test_typescript_value_text() {
    let dialect = Dialect {
        typescript: true,
        ..Dialect::default()
    };
    insta::assert_snapshot!(
        value_text("class A implements I { private x: number = 1; m<T>(a: T): T { return a!; } }", dialect),
        @"class A { private x = 1 ; m ( a ) { return a ; } }"
    );
}

#[test]
fn test_shorthand_and_export_roles() {
    let source = "const a = 1; export { a }; f({ a });";
    let file = parse_file(source, Dialect::default()).unwrap();
    let roles: Vec<_> = file
        .tokens
        .iter()
        .filter(|token| token.text(source) == "a")
        .map(|token| token.identifier_role)
        .collect();
    assert_eq!(
        roles,
        vec![
            Some(IdentifierRole::TopLevelDeclaration),
            Some(IdentifierRole::ExportAccess),
            Some(IdentifierRole::ObjectShorthand),
        ]
    );
}

#[test]
fn test_errors_have_line_and_column() {
    let error = parse_file("function f() {\n  return (;\n}", Dialect::default()).unwrap_err();
    assert_eq!(error.to_string(), "Unexpected token (2:11)");
}
