//! Float helpers that route through `libm` when the standard library is off.

pub(crate) fn sqrt(v: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        v.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrt(v)
    }
}

pub(crate) fn sin_cos(angle: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (libm::sin(angle), libm::cos(angle))
    }
}

pub(crate) fn atan2(y: f64, x: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    {
        libm::atan2(y, x)
    }
}

pub(crate) fn abs(v: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        v.abs()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::fabs(v)
    }
}
