//! Tree-walking evaluator.
//!
//! Statements execute against a flat [`Scope`]; expressions produce
//! [`Value`]s. Program output goes straight to a sink borrowed from the
//! embedder, so prints appear in program order even if evaluation later
//! fails.

use std::io::Write;
use std::rc::Rc;

use crate::ast::{BinaryOperator, Comparator, Expression, Program, Statement};
use crate::runtime::{Class, InstanceObject, RuntimeError, Scope, Value};

/// Control-flow marker for statement execution. `Return` bubbles out of
/// nested blocks and is consumed at the method-call boundary.
enum ExecResult {
    Continue,
    Return(Value),
}

pub struct Interpreter<'a> {
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Self { output }
    }

    /// Runs a whole program against a fresh top-level scope. A `return` at
    /// module level stops execution; its value is discarded.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let mut globals = Scope::new();
        self.exec_block(&program.statements, &mut globals)?;
        Ok(())
    }

    fn exec_block(
        &mut self,
        body: &[Statement],
        scope: &mut Scope,
    ) -> Result<ExecResult, RuntimeError> {
        for statement in body {
            match self.exec_statement(statement, scope)? {
                ExecResult::Continue => {}
                ExecResult::Return(value) => return Ok(ExecResult::Return(value)),
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        scope: &mut Scope,
    ) -> Result<ExecResult, RuntimeError> {
        match statement {
            Statement::Assign { name, value } => {
                let value = self.eval_expression(value, scope)?;
                scope.insert(name.clone(), value);
                Ok(ExecResult::Continue)
            }
            Statement::FieldAssign {
                object,
                field,
                value,
            } => {
                // The target chain is resolved before the right-hand side.
                let target = self.resolve_chain(object, scope)?;
                let type_name = target.type_name();
                let Value::Instance(instance) = target else {
                    return Err(RuntimeError::FieldOnNonInstance {
                        field: field.clone(),
                        type_name,
                    });
                };
                let value = self.eval_expression(value, scope)?;
                instance.set_field(field, value);
                Ok(ExecResult::Continue)
            }
            Statement::Print(args) => {
                self.exec_print(args, scope)?;
                Ok(ExecResult::Continue)
            }
            Statement::Return(value) => {
                let value = self.eval_expression(value, scope)?;
                Ok(ExecResult::Return(value))
            }
            Statement::ClassDef(class) => {
                scope.insert(class.name().to_string(), Value::Class(Rc::clone(class)));
                Ok(ExecResult::Continue)
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                let condition = self.eval_expression(condition, scope)?;
                let body = if condition.is_truthy() {
                    then_body
                } else {
                    else_body
                };
                self.exec_block(body, scope)
            }
            Statement::Expr(expr) => {
                self.eval_expression(expr, scope)?;
                Ok(ExecResult::Continue)
            }
        }
    }

    fn eval_expression(
        &mut self,
        expr: &Expression,
        scope: &mut Scope,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Integer(value) => Ok(Value::Integer(*value)),
            Expression::String(value) => Ok(Value::String(value.clone())),
            Expression::Boolean(value) => Ok(Value::Bool(*value)),
            Expression::None => Ok(Value::None),
            Expression::Variable(ids) => self.resolve_chain(ids, scope),
            Expression::MethodCall {
                object,
                method,
                args,
            } => {
                // Arguments are evaluated before the receiver expression.
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval_expression(arg, scope)?);
                }
                let receiver = self.eval_expression(object, scope)?;
                let type_name = receiver.type_name();
                let Value::Instance(instance) = receiver else {
                    return Err(RuntimeError::MethodOnNonInstance {
                        method: method.clone(),
                        type_name,
                    });
                };
                self.call_method(&instance, method, evaluated)
            }
            Expression::NewInstance { class, args } => self.eval_new_instance(class, args, scope),
            Expression::Stringify(argument) => {
                let value = self.eval_expression(argument, scope)?;
                Ok(Value::String(self.display_value(&value)?))
            }
            Expression::BinaryOp { left, op, right } => {
                self.eval_binary_op(left, *op, right, scope)
            }
            Expression::Not(argument) => {
                let value = self.eval_expression(argument, scope)?;
                Ok(Value::Bool(!value.is_truthy()))
            }
            Expression::Comparison { op, left, right } => {
                let left = self.eval_expression(left, scope)?;
                let right = self.eval_expression(right, scope)?;
                Ok(Value::Bool(self.compare(*op, &left, &right)?))
            }
        }
    }

    fn eval_binary_op(
        &mut self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
        scope: &mut Scope,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOperator::And => {
                if !self.eval_expression(left, scope)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval_expression(right, scope)?;
                Ok(Value::Bool(right.is_truthy()))
            }
            BinaryOperator::Or => {
                if self.eval_expression(left, scope)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval_expression(right, scope)?;
                Ok(Value::Bool(right.is_truthy()))
            }
            BinaryOperator::Add => {
                let left = self.eval_expression(left, scope)?;
                let right = self.eval_expression(right, scope)?;
                self.add(left, right)
            }
            BinaryOperator::Sub => {
                let (l, r) = self.integer_operands("-", left, right, scope)?;
                let value = l
                    .checked_sub(r)
                    .ok_or(RuntimeError::IntegerOverflow { operator: "-" })?;
                Ok(Value::Integer(value))
            }
            BinaryOperator::Mult => {
                let (l, r) = self.integer_operands("*", left, right, scope)?;
                let value = l
                    .checked_mul(r)
                    .ok_or(RuntimeError::IntegerOverflow { operator: "*" })?;
                Ok(Value::Integer(value))
            }
            BinaryOperator::Div => {
                let (l, r) = self.integer_operands("/", left, right, scope)?;
                if r == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                // Truncates toward zero.
                let value = l
                    .checked_div(r)
                    .ok_or(RuntimeError::IntegerOverflow { operator: "/" })?;
                Ok(Value::Integer(value))
            }
        }
    }

    /// `+` adds integers, concatenates strings and dispatches to `__add__`
    /// on a left-hand class instance.
    fn add(&mut self, left: Value, right: Value) -> Result<Value, RuntimeError> {
        match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => {
                let value = l
                    .checked_add(r)
                    .ok_or(RuntimeError::IntegerOverflow { operator: "+" })?;
                Ok(Value::Integer(value))
            }
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            (Value::Instance(instance), right) if instance.has_method("__add__", 1) => {
                self.call_method(&instance, "__add__", vec![right])
            }
            (left, right) => Err(RuntimeError::OperatorNotApplicable {
                operator: "+",
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }

    fn integer_operands(
        &mut self,
        operator: &'static str,
        left: &Expression,
        right: &Expression,
        scope: &mut Scope,
    ) -> Result<(i64, i64), RuntimeError> {
        let left = self.eval_expression(left, scope)?;
        let right = self.eval_expression(right, scope)?;
        match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => Ok((l, r)),
            (left, right) => Err(RuntimeError::OperatorNotApplicable {
                operator,
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }

    /// Resolves a dotted identifier chain: the head in the scope, the rest
    /// through instance field tables.
    fn resolve_chain(&self, ids: &[String], scope: &Scope) -> Result<Value, RuntimeError> {
        let (first, rest) = match ids.split_first() {
            Some(parts) => parts,
            None => {
                return Err(RuntimeError::UndefinedVariable {
                    name: String::new(),
                });
            }
        };
        let mut value = scope
            .get(first)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: first.clone(),
            })?;
        for id in rest {
            value = match value {
                Value::Instance(instance) => instance.field(id),
                other => {
                    return Err(RuntimeError::FieldOnNonInstance {
                        field: id.clone(),
                        type_name: other.type_name(),
                    });
                }
            };
        }
        Ok(value)
    }

    /// Invokes `method` on `receiver` with a fresh call scope holding `self`
    /// and the declared parameters. A body that rebinds `self` makes the
    /// call evaluate to that binding instead of the body's result.
    fn call_method(
        &mut self,
        receiver: &Rc<InstanceObject>,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let class = Rc::clone(receiver.class());
        let Some(found) = class.method_with_arity(method, args.len()) else {
            return Err(RuntimeError::UnknownMethod {
                method: method.to_string(),
                class: class.name().to_string(),
            });
        };

        let mut locals = Scope::new();
        locals.insert("self".to_string(), Value::Instance(Rc::clone(receiver)));
        for (param, arg) in found.formal_params.iter().zip(args) {
            locals.insert(param.clone(), arg);
        }

        let result = match self.exec_block(&found.body, &mut locals)? {
            ExecResult::Continue => Value::None,
            ExecResult::Return(value) => value,
        };
        match locals.get("self") {
            Some(Value::Instance(current)) if Rc::ptr_eq(current, receiver) => Ok(result),
            Some(other) => Ok(other.clone()),
            None => Ok(result),
        }
    }

    /// Builds the instance first; `__init__` runs only when it exists with
    /// matching arity, in which case a non-`None` result (including a
    /// rebound `self`) replaces the fresh instance.
    fn eval_new_instance(
        &mut self,
        class: &Rc<Class>,
        args: &[Expression],
        scope: &mut Scope,
    ) -> Result<Value, RuntimeError> {
        let instance = Rc::new(InstanceObject::new(Rc::clone(class)));
        if class.method_with_arity("__init__", args.len()).is_none() {
            // No matching constructor: the arguments are never evaluated.
            return Ok(Value::Instance(instance));
        }
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval_expression(arg, scope)?);
        }
        let initialized = self.call_method(&instance, "__init__", evaluated)?;
        if matches!(initialized, Value::None) {
            Ok(Value::Instance(instance))
        } else {
            Ok(initialized)
        }
    }

    fn exec_print(&mut self, args: &[Expression], scope: &mut Scope) -> Result<(), RuntimeError> {
        let argc = args.len();
        for (index, arg) in args.iter().enumerate() {
            let value = self.eval_expression(arg, scope)?;
            let rendered = self.display_value(&value)?;
            self.write_output(&rendered)?;
            if index + 1 != argc {
                self.write_output(" ")?;
            }
        }
        self.write_output("\n")
    }

    /// Textual form of a value. Instances render through a zero-parameter
    /// `__str__` when their class has one, falling back to an address-like
    /// form otherwise.
    fn display_value(&mut self, value: &Value) -> Result<String, RuntimeError> {
        match value {
            Value::None => Ok("None".to_string()),
            Value::Integer(value) => Ok(value.to_string()),
            Value::Bool(value) => Ok(if *value { "True" } else { "False" }.to_string()),
            Value::String(value) => Ok(value.clone()),
            Value::Class(class) => Ok(format!("Class {}", class.name())),
            Value::Instance(instance) => {
                if instance.has_method("__str__", 0) {
                    let instance = Rc::clone(instance);
                    let rendered = self.call_method(&instance, "__str__", Vec::new())?;
                    self.display_value(&rendered)
                } else {
                    Ok(format!(
                        "<{} object at {:p}>",
                        instance.class().name(),
                        Rc::as_ptr(instance)
                    ))
                }
            }
        }
    }

    fn compare(
        &mut self,
        op: Comparator,
        left: &Value,
        right: &Value,
    ) -> Result<bool, RuntimeError> {
        match op {
            Comparator::Equal => self.equal(left, right),
            Comparator::NotEqual => Ok(!self.equal(left, right)?),
            Comparator::Less => self.less(left, right),
            Comparator::LessOrEqual => Ok(!self.greater(left, right)?),
            Comparator::Greater => self.greater(left, right),
            Comparator::GreaterOrEqual => Ok(!self.less(left, right)?),
        }
    }

    /// `None` equals only `None`; matching primitive kinds compare by value;
    /// a left-hand instance dispatches to `__eq__`. Everything else is an
    /// error.
    fn equal(&mut self, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
        match (left, right) {
            (Value::None, Value::None) => Ok(true),
            (Value::Bool(l), Value::Bool(r)) => Ok(l == r),
            (Value::Integer(l), Value::Integer(r)) => Ok(l == r),
            (Value::String(l), Value::String(r)) => Ok(l == r),
            (Value::Instance(instance), _) if instance.has_method("__eq__", 1) => {
                let instance = Rc::clone(instance);
                let result = self.call_method(&instance, "__eq__", vec![right.clone()])?;
                Ok(result.is_truthy())
            }
            _ => Err(RuntimeError::OperatorNotApplicable {
                operator: "==",
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }

    fn less(&mut self, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
        match (left, right) {
            (Value::Bool(l), Value::Bool(r)) => Ok(l < r),
            (Value::Integer(l), Value::Integer(r)) => Ok(l < r),
            (Value::String(l), Value::String(r)) => Ok(l < r),
            (Value::Instance(instance), _) if instance.has_method("__lt__", 1) => {
                let instance = Rc::clone(instance);
                let result = self.call_method(&instance, "__lt__", vec![right.clone()])?;
                Ok(result.is_truthy())
            }
            _ => Err(RuntimeError::OperatorNotApplicable {
                operator: "<",
                left: left.type_name(),
                right: right.type_name(),
            }),
        }
    }

    /// Both primitive relations are evaluated unconditionally so that a
    /// raising overload raises for every derived comparison.
    fn greater(&mut self, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
        let equal = self.equal(left, right)?;
        let less = self.less(left, right)?;
        Ok(!equal && !less)
    }

    fn write_output(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.output
            .write_all(text.as_bytes())
            .map_err(|error| RuntimeError::Output {
                message: error.to_string(),
            })
    }
}
