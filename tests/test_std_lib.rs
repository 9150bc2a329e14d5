//! Tests for the core builtins.
//!
//! Each script runs on a fresh runtime; values are read back from the last
//! top-level statement and `print` output is captured in memory.

extern crate beans;


use beans::runner::ds::ErrorKind;
use script_util::{boolean, eval, number, output_of, string};

fn error_kind(source: &str) -> ErrorKind {
    match eval(source) {
        Ok(value) => panic!("expected an error, got {:?}", value),
        Err(e) => e.kind(),
    }
}

// ============================================================================
// Definition tests
// ============================================================================

mod definition_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_def_round_trip() {
        assert_eq!(eval("def(<x>): 5\nx").unwrap(), number(5.0));
    }

    #[test]
    fn test_def_immediate_round_trip() {
        assert_eq!(eval("defI(<x>): \"hello\"\nx").unwrap(), string("hello"));
    }

    #[test]
    fn test_def_is_deferred_and_def_immediate_is_not() {
        let lines = output_of(
            "def(<later>): print(\"deferred\")\n\
             defI(<now>): add(1, 1)\n\
             print(\"defined\")\n\
             later",
        );
        assert_eq!(lines, vec!["defined", "deferred"]);
    }

    #[test]
    fn test_def_immediate_stores_the_evaluated_literal() {
        assert_eq!(eval("defI(<sum>): add(2, 3)\nsum").unwrap(), number(5.0));
    }

    #[test]
    fn test_duplicate_def_is_memory_error() {
        assert_eq!(error_kind("def(<x>): 1\ndef(<x>): 2"), ErrorKind::Memory);
    }

    #[test]
    fn test_duplicate_def_immediate_is_memory_error() {
        assert_eq!(error_kind("defI(<x>): 1\ndefI(<x>): 2"), ErrorKind::Memory);
        assert_eq!(error_kind("def(<x>): 1\ndefI(<x>): 2"), ErrorKind::Memory);
    }

    #[test]
    fn test_def_requires_memory_literal() {
        let err = eval("def(\"x\"): 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.message(), "Expected Memory, instead got String");
    }

    #[test]
    fn test_def_may_shadow_outer_definition() {
        let lines = output_of("defI(<x>): 1\n{ defI(<x>): 2 print(x) }\nprint(x)");
        assert_eq!(lines, vec!["2", "1"]);
    }

    #[test]
    fn test_def_immediate_rejects_scope() {
        assert_eq!(error_kind("defI(<x>) { }"), ErrorKind::Type);
        assert_eq!(error_kind("defI(<x>)"), ErrorKind::Type);
    }

    #[test]
    fn test_def_without_body_yields_nothing() {
        assert_eq!(eval("def(<empty>)\nempty").unwrap(), None);
    }
}

// ============================================================================
// Mutation tests
// ============================================================================

mod set_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_undefined_is_memory_error() {
        let err = eval("set(<y>): 3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Memory);
        assert_eq!(err.message(), "Value <y> is not defined");
    }

    #[test]
    fn test_set_overwrites_binding() {
        assert_eq!(eval("defI(<y>): 1\nset(<y>): add(y, 1)\ny").unwrap(), number(2.0));
    }

    #[test]
    fn test_set_replaces_function_with_literal() {
        assert_eq!(eval("def(<f>): add(1, 2)\nset(<f>): \"replaced\"\nf").unwrap(), string("replaced"));
    }

    #[test]
    fn test_set_does_not_ascend() {
        assert_eq!(error_kind("defI(<outer>): 1\n{ set(<outer>): 2 }"), ErrorKind::Memory);
    }
}

// ============================================================================
// Arithmetic tests
// ============================================================================

mod arithmetic_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_numbers() {
        assert_eq!(eval("add(2, 3)").unwrap(), number(5.0));
        assert_eq!(eval("add(1, 2, 3, 4)").unwrap(), number(10.0));
    }

    #[test]
    fn test_add_strings() {
        assert_eq!(eval("add(\"a\", \"b\")").unwrap(), string("ab"));
    }

    #[test]
    fn test_add_mismatched_types() {
        assert_eq!(error_kind("add(2, \"3\")"), ErrorKind::Type);
        assert_eq!(error_kind("add(\"2\", 3)"), ErrorKind::Type);
        assert_eq!(error_kind("add(true, true)"), ErrorKind::Type);
    }

    #[test]
    fn test_add_with_str_cast() {
        assert_eq!(eval("add(\"n=\", str(3))").unwrap(), string("n=3"));
    }

    #[test]
    fn test_sub_and_div() {
        assert_eq!(eval("sub(10, 4)").unwrap(), number(6.0));
        assert_eq!(eval("div(7, 2)").unwrap(), number(3.5));
        assert_eq!(error_kind("sub(\"10\", 4)"), ErrorKind::Type);
        assert_eq!(error_kind("div(1, \"2\")"), ErrorKind::Type);
    }

    #[test]
    fn test_mul() {
        assert_eq!(eval("mul(6, 7)").unwrap(), number(42.0));
        assert_eq!(eval("mul(\"ab\", 3)").unwrap(), string("ababab"));
        assert_eq!(error_kind("mul(\"ab\", \"3\")"), ErrorKind::Type);
    }

    #[test]
    fn test_mul_string_length_is_bounded() {
        assert_eq!(error_kind("mul(\"a\", 3000000000)"), ErrorKind::Range);
        assert_eq!(eval("str(mul(\"a\", 3000000000))").unwrap_err().message(), "Invalid string length");
    }
}

// ============================================================================
// Conversion tests
// ============================================================================

mod conversion_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_num() {
        assert_eq!(eval("num(\"42\")").unwrap(), number(42.0));
        assert_eq!(eval("num(\"7 apples\")").unwrap(), number(7.0));
        assert_eq!(eval("num(12.9)").unwrap(), number(12.0));
    }

    #[test]
    fn test_num_of_non_numeric_text_is_nan() {
        let value = eval("num(\"beans\")").unwrap();
        assert!(matches!(value, Some(beans::runner::ds::Value::Number(n)) if n.is_nan()));
    }

    #[test]
    fn test_str() {
        assert_eq!(eval("str(1.5)").unwrap(), string("1.5"));
        assert_eq!(eval("str(10)").unwrap(), string("10"));
        assert_eq!(eval("str(true)").unwrap(), string("true"));
        assert_eq!(eval("str(<slot>)").unwrap(), string("<slot>"));
    }
}

// ============================================================================
// Control tests
// ============================================================================

mod control_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_if_runs_yield_once_when_truthy() {
        let (mut rt, sink) = script_util::runtime_with_output();
        let result = script_util::eval_in(&mut rt, "if(true): print(\"ran\")").unwrap();
        assert_eq!(result, boolean(true));
        assert_eq!(sink.lines(), vec!["ran"]);
    }

    #[test]
    fn test_if_skips_yield_when_falsy() {
        let (mut rt, sink) = script_util::runtime_with_output();
        let result = script_util::eval_in(&mut rt, "if(0) { print(\"ran\") }").unwrap();
        assert_eq!(result, boolean(false));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_unless_is_the_complement_of_if() {
        for condition in ["true", "false", "0", "1", "\"\"", "\"x\""].iter() {
            let if_ran = eval(&format!("if({}): 1", condition)).unwrap();
            let unless_ran = eval(&format!("unless({}): 1", condition)).unwrap();
            assert_eq!(if_ran == boolean(true), unless_ran == boolean(false), "{}", condition);
        }
        assert_eq!(output_of("unless(false): print(\"ran\")"), vec!["ran"]);
    }

    #[test]
    fn test_if_requires_castable_condition() {
        let err = eval("if(param(0)): 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.message(), "nothing is not type cast-able to boolean");
    }

    #[test]
    fn test_not() {
        assert_eq!(eval("not(false)").unwrap(), boolean(true));
        assert_eq!(eval("not(\"text\")").unwrap(), boolean(false));
    }

    #[test]
    fn test_is_matches_type_and_value() {
        assert_eq!(eval("is(4): 4").unwrap(), boolean(true));
        assert_eq!(eval("is(4): \"4\"").unwrap(), boolean(false));
        assert_eq!(eval("is(\"a\"): add(\"a\", \"\")").unwrap(), boolean(true));
        assert_eq!(eval("is(<a>): <a>").unwrap(), boolean(true));
    }

    #[test]
    fn test_exists() {
        assert_eq!(eval("exists(<x>)").unwrap(), boolean(false));
        assert_eq!(eval("defI(<x>): 1\nexists(<x>)").unwrap(), boolean(true));
        assert_eq!(eval("exists(<print>)").unwrap(), boolean(true));
        assert_eq!(eval("defI(<x>): 1\n{ exists(<x>) }").unwrap(), None);
        assert_eq!(eval("defI(<x>): 1\n{ return(exists(<x>)) }").unwrap(), boolean(true));
    }

    #[test]
    fn test_param_and_forwarding() {
        let lines = output_of(
            "def(<double>) { return(mul(param(0), 2)) }\n\
             def(<wrapper>) { return(double()) }\n\
             print(double(21))\n\
             print(wrapper(5))\n\
             print(param(0))",
        );
        assert_eq!(lines, vec!["42", "10", "[null]"]);
    }

    #[test]
    fn test_param_index_must_name_an_argument() {
        let lines = output_of(
            "def(<show>) { print(param(\"0\")) print(param(true)) print(param(0)) }\n\
             show(1)",
        );
        assert_eq!(lines, vec!["[null]", "[null]", "1"]);
    }

    #[test]
    fn test_yield_runs_callers_block() {
        let lines = output_of("def(<twice>) { yield() yield() }\ntwice { print(\"hi\") }");
        assert_eq!(lines, vec!["hi", "hi"]);
    }

    #[test]
    fn test_yield_result_is_returned() {
        assert_eq!(eval("def(<wrap>): yield()\nwrap: add(1, 2)").unwrap(), number(3.0));
    }
}

// ============================================================================
// Scope and return tests
// ============================================================================

mod scope_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inner_definition_is_not_visible_outside() {
        let lines = output_of("{ { def(<inner>): 1 } print(exists(<inner>)) }");
        assert_eq!(lines, vec!["false"]);
        assert_eq!(eval("{ defI(<inner>): 1 }\nexists(<inner>)").unwrap(), boolean(false));
    }

    #[test]
    fn test_return_does_not_exit_early() {
        let lines = output_of("def(<f>) { return(1) print(\"after\") }\nprint(f())");
        assert_eq!(lines, vec!["after", "1"]);
    }

    #[test]
    fn test_last_return_wins() {
        assert_eq!(eval("{ return(1) return(2) }").unwrap(), number(2.0));
    }

    #[test]
    fn test_block_without_return_yields_nothing() {
        assert_eq!(eval("{ add(1, 2) }").unwrap(), None);
    }

    #[test]
    fn test_closure_sees_definition_scope() {
        let lines = output_of(
            "defI(<greeting>): \"outer\"\n\
             def(<greet>) { print(greeting) }\n\
             { defI(<greeting>): \"inner\" greet() }",
        );
        assert_eq!(lines, vec!["outer"]);
    }
}

// ============================================================================
// Namespace tests
// ============================================================================

mod obj_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_obj_members() {
        let lines = output_of(
            "obj(<point>) { defI(<x>): 3 def(<sum>) { return(add(x, 4)) } }\n\
             print(point.x)\n\
             print(point.sum())",
        );
        assert_eq!(lines, vec!["3", "7"]);
    }

    #[test]
    fn test_obj_member_does_not_leak() {
        assert_eq!(eval("obj(<o>) { defI(<hidden>): 1 }\nexists(<hidden>)").unwrap(), boolean(false));
    }

    #[test]
    fn test_member_lookup_does_not_ascend() {
        assert_eq!(error_kind("obj(<o>) { }\no.print(1)"), ErrorKind::Reference);
        assert_eq!(error_kind("nothing.here"), ErrorKind::Reference);
    }

    #[test]
    fn test_obj_nested_namespaces() {
        let lines = output_of("obj(<outer>) { obj(<inner>) { defI(<v>): \"deep\" } }\nprint(outer.inner.v)");
        assert_eq!(lines, vec!["deep"]);
    }

    #[test]
    fn test_obj_requires_block() {
        let err = eval("obj(<o>): 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.message(), "Yield to obj must be a block. Instead, I got Number");
    }

    #[test]
    fn test_obj_from_call_must_produce_scope() {
        let err = eval("def(<make>): 5\nobj(<b>): make()").unwrap_err();
        assert_eq!(err.message(), "Yield to obj must be a block. Instead, I got Number");
        assert_eq!(error_kind("def(<make>) { }\nobj(<b>): make()"), ErrorKind::Type);
    }
}
