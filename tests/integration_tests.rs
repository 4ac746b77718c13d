// Copyright 2018-2020 Matthieu Felix
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

extern crate halide;
extern crate num_bigint;

use halide::ast::{Node, NodeKind};
use halide::error::{Error, SyntaxErrorKind};
use halide::lex::{lex, Token, TokenKind};
use halide::parse::parse;
use halide::session::Session;
use halide::value::Value;
use halide::Interpreter;
use num_bigint::BigInt;

fn execute(interpreter: &Interpreter, code: &str) -> Result<Value, Error> {
    let program = parse(code)?;
    let mut results = match program {
        Node::Program(expressions) => expressions
            .iter()
            .map(|e| halide::eval::evaluate(e, interpreter.global_environment()))
            .collect::<Result<Vec<_>, _>>()?,
        other => panic!("expected a program, got {:?}", other),
    };
    Ok(results.pop().unwrap_or(Value::Unspecific))
}

fn execute_to_string(interpreter: &Interpreter, code: &str) -> String {
    execute(interpreter, code).unwrap().to_string()
}

fn int(i: i64) -> Value {
    Value::Integer(BigInt::from(i))
}

#[test]
fn it_adds_two() {
    let interpreter = Interpreter::new();
    assert_eq!(int(4), execute(&interpreter, "(+ 2 2)").unwrap());
}

#[test]
fn nested_add() {
    let interpreter = Interpreter::new();
    assert_eq!(int(2), execute(&interpreter, "(+ (+ 1 1 1) (- 1 2))").unwrap());
}

#[test]
fn conditional() {
    let interpreter = Interpreter::new();
    assert_eq!(int(1), execute(&interpreter, "(if (= 0 0) 1 2)").unwrap());
    assert_eq!(int(2), execute(&interpreter, "(if (= 1 0) 1 2)").unwrap());
    assert_eq!(
        Value::Unspecific,
        execute(&interpreter, "(if #f 1)").unwrap()
    );
}

#[test]
fn factorial() {
    let interpreter = Interpreter::new();
    assert_eq!(
        int(120),
        execute(
            &interpreter,
            "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1))))) (fact 5)"
        )
        .unwrap()
    );
    assert_eq!(
        "30414093201713378043612608166064768844377641568960512000000000000",
        execute_to_string(&interpreter, "(fact 50)")
    );
}

#[test]
fn immediate_lambda() {
    let interpreter = Interpreter::new();
    assert_eq!(int(1), execute(&interpreter, "((lambda (x) x) 1)").unwrap());
    assert_eq!(int(1), execute(&interpreter, "((lambda () 1))").unwrap());
    assert_eq!(
        "(2 3)",
        execute_to_string(&interpreter, "((lambda (a . rest) rest) 1 2 3)")
    );
    assert_eq!(
        "(1 2 3)",
        execute_to_string(&interpreter, "((lambda args args) 1 2 3)")
    );
}

#[test]
fn lambda_arity() {
    let interpreter = Interpreter::new();
    match execute(&interpreter, "((lambda (x y) x) 1)") {
        Err(Error::Arity { got, .. }) => assert_eq!(1, got),
        other => panic!("expected arity error, got {:?}", other),
    }
}

#[test]
fn closures_and_counter() {
    let interpreter = Interpreter::new();
    execute(
        &interpreter,
        "(define (make-counter)
           (let ((n 0))
             (lambda () (set! n (+ n 1)) n)))
         (define c1 (make-counter))
         (define c2 (make-counter))",
    )
    .unwrap();
    assert_eq!(int(1), execute(&interpreter, "(c1)").unwrap());
    assert_eq!(int(2), execute(&interpreter, "(c1)").unwrap());
    assert_eq!(int(1), execute(&interpreter, "(c2)").unwrap());
}

#[test]
fn shadow() {
    let interpreter = Interpreter::new();
    assert_eq!(
        int(2),
        execute(&interpreter, "(define x 1) ((lambda (x) x) 2)").unwrap()
    );
    assert_eq!(int(1), execute(&interpreter, "x").unwrap());
}

#[test]
fn mutual_recursion() {
    let interpreter = Interpreter::new();
    let code = "(define (ev? n) (if (= n 0) #t (od? (- n 1))))
                (define (od? n) (if (= n 0) #f (ev? (- n 1))))
                (list (ev? 10) (od? 7) (ev? 3))";
    assert_eq!("(#t #t #f)", execute_to_string(&interpreter, code));
}

#[test]
fn letrec_mutual_recursion() {
    let interpreter = Interpreter::new();
    let code = "(letrec ((ev? (lambda (n) (if (= n 0) #t (od? (- n 1)))))
                         (od? (lambda (n) (if (= n 0) #f (ev? (- n 1))))))
                  (ev? 100))";
    assert_eq!(Value::Boolean(true), execute(&interpreter, code).unwrap());
}

#[test]
fn let_forms() {
    let interpreter = Interpreter::new();
    assert_eq!(
        int(3),
        execute(&interpreter, "(let ((a 1) (b 2)) (+ a b))").unwrap()
    );
    assert_eq!(
        int(2),
        execute(&interpreter, "(define a 10) (let ((a 1) (b a)) (- b 8))").unwrap()
    );
    assert_eq!(
        int(2),
        execute(&interpreter, "(let* ((a 1) (b (+ a 1))) b)").unwrap()
    );
    assert_eq!(int(10), execute(&interpreter, "a").unwrap());
}

#[test]
fn cond_forms() {
    let interpreter = Interpreter::new();
    let code = "(define (sign n) (cond ((< n 0) 'negative) ((= n 0) 'zero) (else 'positive)))
                (list (sign -5) (sign 0) (sign 5))";
    assert_eq!(
        "(negative zero positive)",
        execute_to_string(&interpreter, code)
    );
    assert_eq!(int(7), execute(&interpreter, "(cond (7) (else 1))").unwrap());
    assert_eq!(Value::Unspecific, execute(&interpreter, "(cond (#f 1))").unwrap());
}

#[test]
fn logical_forms() {
    let interpreter = Interpreter::new();
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(and)").unwrap());
    assert_eq!(int(3), execute(&interpreter, "(and 1 2 3)").unwrap());
    assert_eq!(Value::Boolean(false), execute(&interpreter, "(and 1 #f (car '()))").unwrap());
    assert_eq!(Value::Boolean(false), execute(&interpreter, "(or)").unwrap());
    assert_eq!(int(1), execute(&interpreter, "(or #f 1 (car '()))").unwrap());
    assert_eq!(int(2), execute(&interpreter, "(when (= 1 1) 1 2)").unwrap());
    assert_eq!(Value::Unspecific, execute(&interpreter, "(unless #t 1)").unwrap());
    assert_eq!(int(3), execute(&interpreter, "(begin 1 2 3)").unwrap());
}

#[test]
fn list_ref_range() {
    let interpreter = Interpreter::new();
    execute(&interpreter, "(define l (list 1 2 3 4 5))").unwrap();
    match execute(&interpreter, "(list-ref l 5)") {
        Err(Error::Range { .. }) => (),
        other => panic!("expected range error, got {:?}", other),
    }
    match execute(&interpreter, "(list-ref l -1)") {
        Err(Error::Range { limit, .. }) => assert_eq!("5", limit),
        other => panic!("expected range error, got {:?}", other),
    }
    assert_eq!(int(5), execute(&interpreter, "(list-ref l 4)").unwrap());
}

#[test]
fn append_edge_cases() {
    let interpreter = Interpreter::new();
    assert_eq!(Value::EmptyList, execute(&interpreter, "(append)").unwrap());
    assert_eq!(
        Value::Boolean(true),
        execute(&interpreter, "(define l '(1 2 3)) (equal? (append l) l)").unwrap()
    );
    assert_eq!(
        "(1 2 3 4)",
        execute_to_string(&interpreter, "(append '(1) '(2 3) '() '(4))")
    );
    assert_eq!("(1 . 2)", execute_to_string(&interpreter, "(append '(1) 2)"));
    assert!(execute(&interpreter, "(append 1 '(2))").is_err());
}

#[test]
fn reverse_and_length() {
    let interpreter = Interpreter::new();
    execute(&interpreter, "(define l '(1 (2 3) \"x\" #\\a))").unwrap();
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(list? l)").unwrap());
    assert_eq!(
        Value::Boolean(true),
        execute(&interpreter, "(= (length (reverse l)) (length l))").unwrap()
    );
    assert_eq!(
        Value::Boolean(true),
        execute(&interpreter, "(equal? (reverse (reverse l)) l)").unwrap()
    );
    assert_eq!(
        "(#\\a \"x\" (2 3) 1)",
        execute_to_string(&interpreter, "(reverse l)")
    );
    assert_eq!(Value::Boolean(false), execute(&interpreter, "(list? '(1 . 2))").unwrap());
}

#[test]
fn pairs() {
    let interpreter = Interpreter::new();
    assert_eq!(int(1), execute(&interpreter, "(car (cons 1 2))").unwrap());
    assert_eq!(int(2), execute(&interpreter, "(cdr (cons 1 2))").unwrap());
    assert_eq!(
        "(10 . 2)",
        execute_to_string(
            &interpreter,
            "(define p (cons 1 2)) (define q p) (set-car! p 10) p"
        )
    );
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(eq? p q)").unwrap());
    assert_eq!(int(10), execute(&interpreter, "(car q)").unwrap());
    match execute(&interpreter, "(car '())") {
        Err(Error::Type { expected, .. }) => assert_eq!("pair", expected),
        other => panic!("expected type error, got {:?}", other),
    }
}

#[test]
fn membership() {
    let interpreter = Interpreter::new();
    assert_eq!("(c d)", execute_to_string(&interpreter, "(memq 'c '(a b c d))"));
    assert_eq!(Value::Boolean(false), execute(&interpreter, "(memv 5 '(1 2))").unwrap());
    assert_eq!(
        "((1) 2)",
        execute_to_string(&interpreter, "(member (list 1) '(0 (1) 2))")
    );
    assert_eq!("(b 2)", execute_to_string(&interpreter, "(assq 'b '((a 1) (b 2)))"));
}

#[test]
fn parse_procedure_call() {
    let program = parse("(a b c)").unwrap();
    let call = program.child(0).unwrap();
    assert_eq!(NodeKind::ProcedureCall, call.kind());
    assert_eq!("(a b c)", call.to_text());
}

#[test]
fn lex_literals() {
    assert_eq!(vec![Token::new(TokenKind::Number, "123")], lex("123"));
    assert_eq!(vec![Token::new(TokenKind::Boolean, "#t")], lex("#t"));
}

#[test]
fn unbound_assignment() {
    let interpreter = Interpreter::new();
    match execute(&interpreter, "(set! nowhere 1)") {
        Err(Error::Unbound(name)) => assert_eq!("nowhere", name),
        other => panic!("expected unbound error, got {:?}", other),
    }
    assert!(execute(&interpreter, "nowhere").is_err());
}

#[test]
fn bindings_survive_errors() {
    let interpreter = Interpreter::new();
    assert!(execute(&interpreter, "(define x 42) (car 1)").is_err());
    assert_eq!(int(42), execute(&interpreter, "x").unwrap());
}

#[test]
fn not_implemented_forms() {
    let interpreter = Interpreter::new();
    for (code, form) in &[
        ("(case 1 ((1) 2))", "case"),
        ("(do ((i 0 (+ i 1))) ((= i 3)))", "do"),
        ("(delay 1)", "delay"),
        ("(define-syntax foo (syntax-rules ()))", "define-syntax"),
    ] {
        match execute(&interpreter, code) {
            Err(Error::Syntax(e)) => {
                assert_eq!(SyntaxErrorKind::NotImplemented(form.to_string()), e.kind)
            }
            other => panic!("expected not implemented for {}, got {:?}", code, other),
        }
    }
}

#[test]
fn dot_in_procedure_call() {
    let interpreter = Interpreter::new();
    match execute(&interpreter, "(list 1 . 2)") {
        Err(Error::Syntax(e)) => assert_eq!(SyntaxErrorKind::UnexpectedToken, e.kind),
        other => panic!("expected syntax error, got {:?}", other),
    }
    assert_eq!("(1 . 2)", execute_to_string(&interpreter, "'(1 . 2)"));
}

#[test]
fn vector_mutation_with_bad_arguments() {
    let interpreter = Interpreter::new();
    execute(&interpreter, "(define v (make-vector 2 0))").unwrap();
    for code in &["(vector-set! v v 0)", "(vector-fill! v 1 v)", "(vector-set! v (list v) 0)"] {
        match execute(&interpreter, code) {
            Err(Error::Type { expected, .. }) => assert_eq!("integer", expected),
            other => panic!("expected type error for {}, got {:?}", code, other),
        }
    }
    assert_eq!("#(0 0)", execute_to_string(&interpreter, "v"));
}

#[test]
fn case_insensitive_comparisons() {
    let interpreter = Interpreter::new();
    for code in &[
        "(char-ci=? #\\a #\\A)",
        "(char-ci<? #\\a #\\B)",
        "(char-ci>=? #\\Z #\\z #\\y)",
        "(string-ci<? \"apple\" \"BANANA\")",
        "(string-ci>? \"Zebra\" \"apple\")",
        "(string-ci<=? \"abc\" \"ABC\")",
    ] {
        assert_eq!(Value::Boolean(true), execute(&interpreter, code).unwrap(), "{}", code);
    }
    assert_eq!(
        Value::Boolean(false),
        execute(&interpreter, "(string<? \"apple\" \"BANANA\")").unwrap()
    );
}

#[test]
fn syntax_errors() {
    let interpreter = Interpreter::new();
    assert!(execute(&interpreter, "(1 2").is_err());
    assert!(execute(&interpreter, "(lambda (x x) x)").is_err());
    assert!(execute(&interpreter, "(if)").is_err());
    assert!(execute(&interpreter, "(quote)").is_err());
}

#[test]
fn numeric_tower() {
    let interpreter = Interpreter::new();
    assert_eq!("1/3", execute_to_string(&interpreter, "(/ 1 3)"));
    assert_eq!(int(1), execute(&interpreter, "(+ 1/2 1/2)").unwrap());
    assert_eq!(Value::Real(3.0), execute(&interpreter, "(* 1.5 2)").unwrap());
    assert_eq!(Value::Real(2.0), execute(&interpreter, "(+ 1+2i 1-2i)").unwrap());
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(= 1/2 0.5)").unwrap());
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(< 1 3/2 2.5)").unwrap());
    assert_eq!(int(-1), execute(&interpreter, "(modulo 5 -3)").unwrap());
    assert_eq!(int(2), execute(&interpreter, "(remainder 5 -3)").unwrap());
    assert_eq!(Value::Boolean(false), execute(&interpreter, "(integer? 2.0)").unwrap());
    assert_eq!(Value::Boolean(true), execute(&interpreter, "(exact? 1/2)").unwrap());
    match execute(&interpreter, "(/ 1 0)") {
        Err(Error::DivisionByZero) => (),
        other => panic!("expected division by zero, got {:?}", other),
    }
}

#[test]
fn vectors() {
    let interpreter = Interpreter::new();
    execute(&interpreter, "(define v (make-vector 3 0))").unwrap();
    assert_eq!(
        "#(0 5 0)",
        execute_to_string(&interpreter, "(vector-set! v 1 5) v")
    );
    assert_eq!(int(3), execute(&interpreter, "(vector-length v)").unwrap());
    assert!(execute(&interpreter, "(vector-ref v 3)").is_err());
    assert_eq!("(0 5)", execute_to_string(&interpreter, "(vector->list v 0 2)"));
    assert_eq!("#(1 2)", execute_to_string(&interpreter, "(list->vector '(1 2))"));
    assert_eq!("#(1 #(2))", execute_to_string(&interpreter, "'#(1 #(2))"));
}

#[test]
fn higher_order() {
    let interpreter = Interpreter::new();
    assert_eq!(
        "(2 4 6)",
        execute_to_string(&interpreter, "(map (lambda (x) (* 2 x)) '(1 2 3))")
    );
    assert_eq!(
        "(11 22)",
        execute_to_string(&interpreter, "(map + '(1 2) '(10 20 30))")
    );
    assert_eq!(int(10), execute(&interpreter, "(apply + 1 2 '(3 4))").unwrap());
    assert_eq!(
        int(6),
        execute(
            &interpreter,
            "(define total 0) (for-each (lambda (x) (set! total (+ total x))) '(1 2 3)) total"
        )
        .unwrap()
    );
}

#[test]
fn strings_and_symbols() {
    let interpreter = Interpreter::new();
    assert_eq!(
        "\"foobar\"",
        execute_to_string(&interpreter, "(string-append \"foo\" \"bar\")")
    );
    assert_eq!(
        "abc",
        execute_to_string(&interpreter, "(string->symbol \"abc\")")
    );
    assert_eq!(
        Value::Boolean(true),
        execute(&interpreter, "(eq? 'abc (string->symbol \"abc\"))").unwrap()
    );
}

#[test]
fn user_error() {
    let interpreter = Interpreter::new();
    match execute(&interpreter, "(error \"bad thing:\" 1 \"x\")") {
        Err(Error::User(message)) => assert_eq!("bad thing: 1 \"x\"", message),
        other => panic!("expected user error, got {:?}", other),
    }
}

#[test]
fn session_history() {
    let interpreter = Interpreter::new();
    let mut session = Session::new();
    let program = parse("(+ 1 2) (if #f #f) (+ 1 2) (* 2 5) (+ _ 1)").unwrap();
    for expression in program.children() {
        interpreter.eval_recorded(expression, &mut session).unwrap();
    }
    assert_eq!(3, session.len());
    assert_eq!(Some(&int(3)), session.get(0));
    assert_eq!(Some(&int(10)), session.get(1));
    assert_eq!(Some(&int(11)), session.last());
    assert_eq!(int(11), execute(&interpreter, "_").unwrap());

    assert_eq!("(3 10 11)", execute_to_string(&interpreter, "(_history)"));
    assert_eq!(int(10), execute(&interpreter, "(_history 1)").unwrap());
    assert_eq!(int(3), execute(&interpreter, "(_his 0)").unwrap());
    match execute(&interpreter, "(_history 3)") {
        Err(Error::Range { index, limit }) => {
            assert_eq!("3", index);
            assert_eq!("3", limit);
        }
        other => panic!("expected range error, got {:?}", other),
    }
}

#[test]
fn history_follows_new_values() {
    let interpreter = Interpreter::new();
    let mut session = Session::new();
    assert!(execute(&interpreter, "(_history)").is_err());
    for source in &["1", "(define x 2)", "(_history)"] {
        let program = parse(source).unwrap();
        for expression in program.children() {
            interpreter.eval_recorded(expression, &mut session).unwrap();
        }
    }
    assert_eq!("(1 x)", session.last().unwrap().to_string());
    assert_eq!("(1 x (1 x))", execute_to_string(&interpreter, "(_history)"));
}

#[test]
fn parse_eval_returns_last() {
    let interpreter = Interpreter::new();
    assert_eq!(int(3), interpreter.parse_eval("1 2 3").unwrap());
}
