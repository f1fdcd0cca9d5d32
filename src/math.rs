use num::Float;

use crate::linspace::Linspace;

/// Similar to numpy.interp, for a single sample: linearly interpolates `x`
/// between the ascending `coords`, holding the first and last `y` outside.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let mut iter = coords.iter().copied().enumerate().peekable();

    while let Some((i, (x1, y1))) = iter.next() {
        // Base cases
        if i == 0 && x < x1 {
            return y1;
        }
        if iter.peek().is_none() && x >= x1 {
            return y1;
        }

        let Some(&(_, (x2, y2))) = iter.peek() else {
            continue;
        };

        // Actual interpolation
        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // Empty coordinates or NaN input
    F::nan()
}

/// Composite Simpson integration of `f` over `[a, b]` split into
/// `subintervals` equal parts, each sampled at both ends and its midpoint.
pub(crate) fn simpson<F: Float>(f: impl Fn(F) -> F, a: F, b: F, subintervals: usize) -> F {
    let n = 2 * subintervals;
    let two = F::one() + F::one();
    let four = two + two;
    let h = (b - a) / F::from(n).expect("usize fits in a float");

    let sum = Linspace::new(a, b, n + 1)
        .enumerate()
        .map(|(i, x)| {
            let weight = if i == 0 || i == n {
                F::one()
            } else if i % 2 == 1 {
                four
            } else {
                two
            };

            weight * f(x)
        })
        .fold(F::zero(), |acc, v| acc + v);

    sum * h / (two + F::one())
}

#[test]
fn test_interp() {
    let xs = [0., 1., 1.5, 2.72, 3.24];
    let coords = [(1., 3.), (2., 2.), (3., 0.)];

    assert_eq!(
        xs.iter().map(|x| interp(*x, &coords)).collect::<Vec<f64>>(),
        vec![3., 3., 2.5, 0.5599999999999996, 0.]
    );

    let xs = [2.5, -1., 7.5];
    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(
        xs.iter().map(|x| interp(*x, &coords)).collect::<Vec<f64>>(),
        vec![4., 0., 2.]
    );
}

#[test]
fn test_interp_vertical_step() {
    let coords = [(0., 0.), (1., 0.), (1., 1.), (2., 1.)];

    assert_eq!(interp(0.5, &coords), 0.);
    assert_eq!(interp(1.5, &coords), 1.);
    assert!(interp::<f64>(1., &[]).is_nan());
}

#[test]
fn test_simpson() {
    // Exact for polynomials up to degree three
    let cubic = simpson(|x: f64| x * x * x, 0., 2., 50);
    let line = simpson(|x: f64| 2. * x + 1., -1., 1., 50);

    assert!((cubic - 4.).abs() < 1e-12);
    assert!((line - 2.).abs() < 1e-12);
    assert_eq!(simpson(|_: f64| 1., 3., 3., 50), 0.);
}
