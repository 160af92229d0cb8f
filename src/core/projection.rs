#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::scale::Scale;
use crate::error::{ScaleError, ScaleResult};

/// Maps every value through `scale`; unplaceable values stay `None`.
pub fn project_values<S>(scale: &S, values: &[S::Value]) -> Vec<Option<f64>>
where
    S: Scale + Sync,
    S::Value: Sync,
{
    #[cfg(feature = "parallel-projection")]
    {
        values
            .par_iter()
            .map(|value| scale.domain_to_range(value))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        values
            .iter()
            .map(|value| scale.domain_to_range(value))
            .collect()
    }
}

/// Like [`project_values`], failing on the first value that cannot be placed.
pub fn try_project_values<S>(scale: &S, values: &[S::Value]) -> ScaleResult<Vec<f64>>
where
    S: Scale + Sync,
    S::Value: Sync,
{
    project_values(scale, values)
        .into_iter()
        .enumerate()
        .map(|(index, pixel)| {
            pixel.ok_or_else(|| {
                ScaleError::InvalidData(format!("value at index {index} cannot be projected"))
            })
        })
        .collect()
}

/// Projects `(x, y)` pairs through two scales; a pair is `None` if either side is.
pub fn project_points<X, Y>(
    x_scale: &X,
    y_scale: &Y,
    points: &[(X::Value, Y::Value)],
) -> Vec<Option<(f64, f64)>>
where
    X: Scale + Sync,
    Y: Scale + Sync,
    X::Value: Sync,
    Y::Value: Sync,
{
    let project = |(x, y): &(X::Value, Y::Value)| {
        Some((x_scale.domain_to_range(x)?, y_scale.domain_to_range(y)?))
    };

    #[cfg(feature = "parallel-projection")]
    {
        points.par_iter().map(project).collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        points.iter().map(project).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LinearScale, OrdinalScale};

    #[test]
    fn projection_preserves_order_and_gaps() {
        let scale = LinearScale::new()
            .domain(0.0, 10.0)
            .and_then(|scale| scale.with_range(0.0, 100.0))
            .expect("valid scale");
        let projected = project_values(&scale, &[0.0, f64::NAN, 10.0]);
        assert_eq!(projected, vec![Some(0.0), None, Some(100.0)]);
        assert!(try_project_values(&scale, &[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn points_need_both_coordinates() {
        let x = OrdinalScale::new(["a", "b"])
            .with_range(0.0, 200.0)
            .expect("finite range");
        let y = LinearScale::new();
        let points = vec![("a".to_owned(), 0.5), ("z".to_owned(), 0.5)];
        let projected = project_points(&x, &y, &points);
        assert!(projected[0].is_some());
        assert!(projected[1].is_none());
    }
}
