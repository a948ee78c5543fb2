use crate::error::{RecallError, Result};
use crate::types::{MAX_HALFLIFE_HOURS, MAX_SHAPE, MIN_HALFLIFE_HOURS, MIN_SHAPE};

/// 检查数值是否为正的有限值
pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// 校验 (alpha, beta, halflife) 三元组是否满足模型不变量
pub fn validate_triple(alpha: f64, beta: f64, halflife: f64) -> Result<()> {
    if !is_positive_finite(alpha) || !is_positive_finite(beta) {
        return Err(RecallError::InvalidModel(format!(
            "shape parameters must be positive, got alpha={alpha}, beta={beta}"
        )));
    }
    if !is_positive_finite(halflife) {
        return Err(RecallError::InvalidModel(format!(
            "halflife must be positive, got {halflife}"
        )));
    }
    Ok(())
}

/// 限制形状参数范围，避免极端值导致溢出
pub fn clamp_shape(value: f64) -> f64 {
    value.clamp(MIN_SHAPE, MAX_SHAPE)
}

/// 限制半衰期范围 (小时)
pub fn clamp_halflife(hours: f64) -> f64 {
    hours.clamp(MIN_HALFLIFE_HOURS, MAX_HALFLIFE_HOURS)
}

/// 更新结果写回前的最终检查：拒绝 NaN/Inf，限制在安全范围内
pub fn sanitize_update(alpha: f64, beta: f64, halflife: f64) -> Result<(f64, f64, f64)> {
    if !alpha.is_finite() || !beta.is_finite() || !halflife.is_finite() {
        return Err(RecallError::NumericDegenerate(format!(
            "update produced non-finite state: alpha={alpha}, beta={beta}, halflife={halflife}"
        )));
    }
    if alpha <= 0.0 || beta <= 0.0 || halflife <= 0.0 {
        return Err(RecallError::NumericDegenerate(format!(
            "update produced non-positive state: alpha={alpha}, beta={beta}, halflife={halflife}"
        )));
    }
    Ok((clamp_shape(alpha), clamp_shape(beta), clamp_halflife(halflife)))
}

/// 概率截断到 [0, 1]，NaN 视为 0
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_triple() {
        assert!(validate_triple(3.0, 3.0, 24.0).is_ok());
        assert!(validate_triple(0.0, 3.0, 24.0).is_err());
        assert!(validate_triple(3.0, f64::INFINITY, 24.0).is_err());
        assert!(validate_triple(3.0, 3.0, -1.0).is_err());
    }

    #[test]
    fn test_sanitize_update_clamps() {
        let (a, b, t) = sanitize_update(1e9, 1e-9, 1e12).unwrap();
        assert_eq!(a, MAX_SHAPE);
        assert_eq!(b, MIN_SHAPE);
        assert_eq!(t, MAX_HALFLIFE_HOURS);
    }

    #[test]
    fn test_sanitize_update_rejects_nan() {
        assert!(matches!(
            sanitize_update(f64::NAN, 1.0, 1.0),
            Err(RecallError::NumericDegenerate(_))
        ));
        assert!(sanitize_update(1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(f64::NAN), 0.0);
        assert_eq!(clamp_probability(1.5), 1.0);
        assert_eq!(clamp_probability(-0.1), 0.0);
        assert_eq!(clamp_probability(0.25), 0.25);
    }
}
