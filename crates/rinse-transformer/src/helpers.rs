//! Runtime helper functions injected at the top of the output.

use crate::name_manager::NameManager;
use bitflags::bitflags;

bitflags! {
    /// A set of runtime helpers. Each named flag is one helper.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Helpers: u16 {
        const REQUIRE = 1 << 0;
        const INTEROP_REQUIRE_WILDCARD = 1 << 1;
        const INTEROP_REQUIRE_DEFAULT = 1 << 2;
        const CREATE_NAMED_EXPORT_FROM = 1 << 3;
        const CREATE_STAR_EXPORT = 1 << 4;
        const NULLISH_COALESCE = 1 << 5;
        const ASYNC_NULLISH_COALESCE = 1 << 6;
        const OPTIONAL_CHAIN = 1 << 7;
        const ASYNC_OPTIONAL_CHAIN = 1 << 8;
        const OPTIONAL_CHAIN_DELETE = 1 << 9;
        const ASYNC_OPTIONAL_CHAIN_DELETE = 1 << 10;
    }
}

/// Base names and code templates, in emission order. The first occurrence of
/// the base name in a template is the helper's own name.
const HELPERS: [(&str, &str); 11] = [
    (
        "require",
        r#"
        import {createRequire as CREATE_REQUIRE_NAME} from "module";
        const require = CREATE_REQUIRE_NAME(import.meta.url);
        "#,
    ),
    (
        "interopRequireWildcard",
        r#"
        function interopRequireWildcard(obj) {
          if (obj && obj.__esModule) {
            return obj;
          } else {
            var newObj = {};
            if (obj != null) {
              for (var key in obj) {
                if (Object.prototype.hasOwnProperty.call(obj, key)) {
                  newObj[key] = obj[key];
                }
              }
            }
            newObj.default = obj;
            return newObj;
          }
        }
        "#,
    ),
    (
        "interopRequireDefault",
        r#"
        function interopRequireDefault(obj) {
          return obj && obj.__esModule ? obj : { default: obj };
        }
        "#,
    ),
    (
        "createNamedExportFrom",
        r#"
        function createNamedExportFrom(obj, localName, importedName) {
          Object.defineProperty(exports, localName, {enumerable: true, configurable: true, get: () => obj[importedName]});
        }
        "#,
    ),
    (
        "createStarExport",
        r#"
        function createStarExport(obj) {
          Object.keys(obj)
            .filter((key) => key !== "default" && key !== "__esModule")
            .forEach((key) => {
              if (exports.hasOwnProperty(key)) {
                return;
              }
              Object.defineProperty(exports, key, {enumerable: true, configurable: true, get: () => obj[key]});
            });
        }
        "#,
    ),
    (
        "nullishCoalesce",
        r#"
        function nullishCoalesce(lhs, rhsFn) {
          if (lhs != null) {
            return lhs;
          } else {
            return rhsFn();
          }
        }
        "#,
    ),
    (
        "asyncNullishCoalesce",
        r#"
        async function asyncNullishCoalesce(lhs, rhsFn) {
          if (lhs != null) {
            return lhs;
          } else {
            return await rhsFn();
          }
        }
        "#,
    ),
    (
        "optionalChain",
        r#"
        function optionalChain(ops) {
          let lastAccessLHS = undefined;
          let value = ops[0];
          let i = 1;
          while (i < ops.length) {
            const op = ops[i];
            const fn = ops[i + 1];
            i += 2;
            if ((op === 'optionalAccess' || op === 'optionalCall') && value == null) {
              return undefined;
            }
            if (op === 'access' || op === 'optionalAccess') {
              lastAccessLHS = value;
              value = fn(value);
            } else if (op === 'call' || op === 'optionalCall') {
              value = fn((...args) => value.call(lastAccessLHS, ...args));
              lastAccessLHS = undefined;
            }
          }
          return value;
        }
        "#,
    ),
    (
        "asyncOptionalChain",
        r#"
        async function asyncOptionalChain(ops) {
          let lastAccessLHS = undefined;
          let value = ops[0];
          let i = 1;
          while (i < ops.length) {
            const op = ops[i];
            const fn = ops[i + 1];
            i += 2;
            if ((op === 'optionalAccess' || op === 'optionalCall') && value == null) {
              return undefined;
            }
            if (op === 'access' || op === 'optionalAccess') {
              lastAccessLHS = value;
              value = await fn(value);
            } else if (op === 'call' || op === 'optionalCall') {
              value = await fn((...args) => value.call(lastAccessLHS, ...args));
              lastAccessLHS = undefined;
            }
          }
          return value;
        }
        "#,
    ),
    (
        "optionalChainDelete",
        r#"
        function optionalChainDelete(ops) {
          const result = OPTIONAL_CHAIN_NAME(ops);
          return result == null ? true : result;
        }
        "#,
    ),
    (
        "asyncOptionalChainDelete",
        r#"
        async function asyncOptionalChainDelete(ops) {
          const result = await ASYNC_OPTIONAL_CHAIN_NAME(ops);
          return result == null ? true : result;
        }
        "#,
    ),
];

/// Hands out helper names and emits the code of the helpers that were used.
///
/// Names are reserved up front so that later claims for other generated
/// identifiers can never take them.
#[derive(Debug)]
pub struct HelperManager {
    names: [String; 11],
    create_require_name: String,
    used: Helpers,
}

impl HelperManager {
    pub fn new(names: &mut NameManager) -> Self {
        Self {
            names: HELPERS.map(|(base_name, _)| names.claim_free_name(&format!("_{base_name}"))),
            create_require_name: names.claim_free_name("_createRequire"),
            used: Helpers::empty(),
        }
    }

    fn index(helper: Helpers) -> usize {
        helper.bits().trailing_zeros() as usize
    }

    /// Marks `helper` as used and returns the name to call it by.
    pub fn get_helper_name(&mut self, helper: Helpers) -> &str {
        self.used |= helper;
        &self.names[Self::index(helper)]
    }

    /// Code for every used helper, each on the same line and preceded by a space.
    pub fn emit_helpers(&self) -> String {
        let mut used = self.used;
        if used.contains(Helpers::OPTIONAL_CHAIN_DELETE) {
            used |= Helpers::OPTIONAL_CHAIN;
        }
        if used.contains(Helpers::ASYNC_OPTIONAL_CHAIN_DELETE) {
            used |= Helpers::ASYNC_OPTIONAL_CHAIN;
        }

        let mut result = String::new();
        for (index, (base_name, template)) in HELPERS.iter().enumerate() {
            let helper = Helpers::from_bits_truncate(1u16 << index);
            if !used.contains(helper) {
                continue;
            }
            let code = if helper == Helpers::OPTIONAL_CHAIN_DELETE {
                template.replace(
                    "OPTIONAL_CHAIN_NAME",
                    &self.names[Self::index(Helpers::OPTIONAL_CHAIN)],
                )
            } else if helper == Helpers::ASYNC_OPTIONAL_CHAIN_DELETE {
                template.replace(
                    "ASYNC_OPTIONAL_CHAIN_NAME",
                    &self.names[Self::index(Helpers::ASYNC_OPTIONAL_CHAIN)],
                )
            } else if helper == Helpers::REQUIRE {
                template.replace("CREATE_REQUIRE_NAME", &self.create_require_name)
            } else {
                template.to_string()
            };
            let code = code.replacen(base_name, &self.names[index], 1);
            result.push(' ');
            result.push_str(&code.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unused_helpers_emit_nothing() {
        let mut names = NameManager::default();
        let helpers = HelperManager::new(&mut names);
        assert_eq!(helpers.emit_helpers(), "");
    }

    #[test]
    fn test_emit_interop_default() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new(&mut names);
        assert_eq!(
            helpers.get_helper_name(Helpers::INTEROP_REQUIRE_DEFAULT),
            "_interopRequireDefault"
        );
        assert_eq!(
            helpers.emit_helpers(),
            " function _interopRequireDefault(obj) { return obj && obj.__esModule ? obj : { default: obj }; }"
        );
    }

    #[test]
    fn test_delete_pulls_in_optional_chain() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new(&mut names);
        helpers.get_helper_name(Helpers::OPTIONAL_CHAIN_DELETE);
        let code = helpers.emit_helpers();
        assert!(code.contains("function _optionalChain(ops)"));
        assert!(code.contains("const result = _optionalChain(ops);"));
    }

    #[test]
    fn test_require_helper_uses_create_require() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new(&mut names);
        helpers.get_helper_name(Helpers::REQUIRE);
        assert_eq!(
            helpers.emit_helpers(),
            r#" import {createRequire as _createRequire} from "module"; const _require = _createRequire(import.meta.url);"#
        );
    }
}
