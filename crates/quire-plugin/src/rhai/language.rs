//! The built-in Rhai language.

use std::path::Path;
use std::sync::{Arc, Mutex};

use quire_core::{
    LanguagePlugin, ScriptContext, ScriptError, ScriptRecord, ScriptResult, Value, has_extension,
};
use rhai::{Dynamic, Engine, Scope};

use super::bindings::{self, ResultSlot};

/// File extensions run by the built-in language.
const EXTENSIONS: &[&str] = &["rhai"];

/// The in-process Rhai interpreter.
///
/// Every run gets a fresh [`Engine`], so nothing a script defines survives
/// into the next run.
#[derive(Debug, Default)]
pub struct RhaiLanguage;

impl RhaiLanguage {
    pub fn new() -> Self {
        Self
    }

    /// Create an engine configured for one run.
    fn engine(slot: &ResultSlot, debugger: bool) -> Engine {
        let mut engine = Engine::new();

        // Configure safety limits
        engine.set_max_expr_depths(64, 64);
        engine.set_max_call_levels(64);
        engine.set_max_modules(100);
        engine.set_max_string_size(1024 * 1024); // 1MB strings
        engine.set_max_array_size(10_000);
        engine.set_max_map_size(10_000);

        bindings::register_api(&mut engine, slot);
        bindings::register_output(&mut engine, debugger);
        engine
    }
}

impl LanguagePlugin for RhaiLanguage {
    fn name(&self) -> &str {
        "Rhai"
    }

    fn url(&self) -> &str {
        "https://rhai.rs"
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn comment_prefix(&self) -> &str {
        "//"
    }

    fn can_handle_file(&self, path: &Path) -> bool {
        has_extension(path, EXTENSIONS)
    }

    fn new_script(self: Arc<Self>, path: &Path) -> Option<ScriptRecord> {
        ScriptRecord::open(path, self)
    }

    fn execute(&self, script: &ScriptRecord, ctx: &ScriptContext) -> ScriptResult<Value> {
        let source = script.read_source()?;
        let slot: ResultSlot = Arc::new(Mutex::new(None));
        let engine = Self::engine(&slot, ctx.debugger);

        let mut ast = engine
            .compile(&source)
            .map_err(|e| ScriptError::execution(script.title(), e.to_string()))?;
        ast.set_source(script.path().to_string_lossy().to_string());

        let mut scope = Scope::new();
        scope.push_constant("host", bindings::host_object(script, ctx));

        let last = engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &ast)
            .map_err(|e| ScriptError::execution(script.title(), e.to_string()))?;

        // A non-unit final expression takes precedence over set_result.
        let last = bindings::dynamic_to_value(&last);
        if !last.is_null() {
            return Ok(last);
        }
        let stored = slot.lock().ok().and_then(|mut result| result.take());
        Ok(stored.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dir: &Path, name: &str, body: &str) -> ScriptRecord {
        let path = dir.join(name);
        std::fs::write(&path, format!("// Title: Test\n// Type: standalone\n\n{body}")).unwrap();
        let mut record = Arc::new(RhaiLanguage::new()).new_script(&path).unwrap();
        assert!(record.parse_header());
        record
    }

    #[test]
    fn test_final_expression_is_result() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(dir.path(), "a.rhai", "40 + 2");
        assert_eq!(script.run(&ScriptContext::new()).unwrap(), Value::Integer(42));
    }

    #[test]
    fn test_set_result_when_last_value_is_unit() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(dir.path(), "a.rhai", "set_result(\"done\");");
        assert_eq!(
            script.run(&ScriptContext::new()).unwrap(),
            Value::String("done".into())
        );
    }

    #[test]
    fn test_final_expression_overrides_set_result() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(dir.path(), "a.rhai", "set_result(\"early\");\n\"late\"");
        assert_eq!(
            script.run(&ScriptContext::new()).unwrap(),
            Value::String("late".into())
        );
    }

    #[test]
    fn test_host_object() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(
            dir.path(),
            "a.rhai",
            "host.window_kind + \":\" + host.data.word",
        );
        let mut ctx = ScriptContext::new().with_window_kind("TeXDocument");
        ctx.set("word", "hello");

        assert_eq!(
            script.run(&ctx).unwrap(),
            Value::String("TeXDocument:hello".into())
        );
    }

    #[test]
    fn test_runtime_error_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(dir.path(), "a.rhai", "throw \"boom\";");
        let err = script.run(&ScriptContext::new()).unwrap_err();
        assert!(matches!(err, ScriptError::Execution { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_syntax_error_is_execution_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = record(dir.path(), "a.rhai", "let = ;");
        assert!(matches!(
            script.run(&ScriptContext::new()),
            Err(ScriptError::Execution { .. })
        ));
    }

    #[test]
    fn test_runs_do_not_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let define = record(dir.path(), "a.rhai", "let counter = 1; counter");
        let read = record(dir.path(), "b.rhai", "counter");

        assert_eq!(define.run(&ScriptContext::new()).unwrap(), Value::Integer(1));
        assert!(read.run(&ScriptContext::new()).is_err());
    }
}
