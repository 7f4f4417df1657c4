//! Fatal input errors, raised before any simulation state exists.

use placer_config::ConfigError;

/// Why a placement run refused to start.
///
/// Every variant describes a problem the caller must fix in the input or
/// configuration. Shortfalls in the result itself (residual overlaps,
/// boundary violations, cancellation) are never errors; they are reported
/// through diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// The component list is empty.
    #[error("no components to place")]
    EmptyComponents,

    /// Two components share an id.
    #[error("duplicate component id '{0}'")]
    DuplicateComponent(String),

    /// A connection or net names a component that does not exist.
    #[error("{context} references unknown component '{id}'")]
    UnknownComponent {
        /// Which connection or net made the reference.
        context: String,
        /// The unresolved id.
        id: String,
    },

    /// A locked component has no fixed position.
    #[error("locked component '{0}' has no fixed_position")]
    MissingFixedPosition(String),

    /// A fixed or initial position is NaN or infinite.
    #[error("component '{0}' has a non-finite position")]
    InvalidPosition(String),

    /// The board leaves no usable interior once the margin is removed.
    #[error("board {width} x {height} with margin {margin} has no usable interior")]
    InvalidBoard {
        /// Board width.
        width: f64,
        /// Board height.
        height: f64,
        /// Margin in effect.
        margin: f64,
    },

    /// A component is larger than the usable board interior.
    #[error(
        "component '{id}' ({width} x {height}) does not fit the usable board area ({usable_width} x {usable_height})"
    )]
    ComponentExceedsBoard {
        /// Component id.
        id: String,
        /// Component width.
        width: f64,
        /// Component height.
        height: f64,
        /// Interior width.
        usable_width: f64,
        /// Interior height.
        usable_height: f64,
    },

    /// A component has a zero, negative, or non-finite dimension.
    #[error("component '{id}' has invalid dimensions {width} x {height}")]
    InvalidDimensions {
        /// Component id.
        id: String,
        /// Component width.
        width: f64,
        /// Component height.
        height: f64,
    },

    /// The configuration failed validation.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_component() {
        let err = PlacementError::UnknownComponent {
            context: "connection 2".into(),
            id: "U9".into(),
        };
        assert_eq!(
            format!("{err}"),
            "connection 2 references unknown component 'U9'"
        );
    }

    #[test]
    fn display_invalid_board() {
        let err = PlacementError::InvalidBoard {
            width: 10.0,
            height: 10.0,
            margin: 5.0,
        };
        assert_eq!(
            format!("{err}"),
            "board 10 x 10 with margin 5 has no usable interior"
        );
    }

    #[test]
    fn config_error_converts() {
        let err: PlacementError =
            ConfigError::ValidationError("`iterations` must be positive".into()).into();
        assert!(matches!(err, PlacementError::InvalidConfig(_)));
        assert_eq!(
            format!("{err}"),
            "validation error: `iterations` must be positive"
        );
    }
}
