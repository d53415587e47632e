use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Cannot access field '{field}' on value of type {type_name}")]
    FieldOnNonInstance {
        field: String,
        type_name: &'static str,
    },
    #[error("Unknown method '{method}' for class {class}")]
    UnknownMethod { method: String, class: String },
    #[error("Cannot call method '{method}' on value of type {type_name}")]
    MethodOnNonInstance {
        method: String,
        type_name: &'static str,
    },
    #[error("Operator '{operator}' is not applicable to types {left} and {right}")]
    OperatorNotApplicable {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in '{operator}'")]
    IntegerOverflow { operator: &'static str },
    #[error("Failed to write output: {message}")]
    Output { message: String },
}
