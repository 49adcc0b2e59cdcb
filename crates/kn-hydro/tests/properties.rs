//! Property tests for the hydro kernels.

use kn_core::{Tolerances, nearly_equal};
use kn_hydro::{GammaLaw, Plm, Primitive, RiemannSolverKind};
use proptest::prelude::*;

fn eos() -> GammaLaw {
    GammaLaw::new(4.0 / 3.0).unwrap()
}

fn primitive() -> impl Strategy<Value = Primitive> {
    (
        -3.0_f64..1.0,   // log10 density
        -10.0_f64..10.0, // four-velocity
        -4.0_f64..1.0,   // log10 temperature p/rho
        0.0_f64..1.0,    // scalar
    )
        .prop_map(|(log_rho, u, log_temp, s)| {
            let rho = 10f64.powf(log_rho);
            Primitive::new(rho, u, rho * 10f64.powf(log_temp), s)
        })
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-8 * scale.max(1e-300)
}

proptest! {
    #[test]
    fn hllc_flux_is_mirror_symmetric(l in primitive(), r in primitive()) {
        let eos = eos();
        for kind in [RiemannSolverKind::HLLC, RiemannSolverKind::HLLE] {
            let f = kind.solve(&eos, &l, &r);
            let g = kind.solve(&eos, &r.mirrored(), &l.mirrored());
            let scale = f.flux.max_abs().max(g.flux.max_abs());

            prop_assert!(close(f.flux.lab_density, -g.flux.lab_density, scale));
            prop_assert!(close(f.flux.energy, -g.flux.energy, scale));
            prop_assert!(close(f.flux.scalar, -g.flux.scalar, scale));
            prop_assert!(close(f.flux.momentum, g.flux.momentum, scale));
            prop_assert!(close(f.max_wave_speed, g.max_wave_speed, 1.0));
        }
    }

    #[test]
    fn characteristics_bracket_flow_and_stay_subluminal(p in primitive()) {
        let eos = eos();
        let (lm, lp) = eos.wave_speeds(&p);
        let v = p.velocity();

        prop_assert!(lm > -1.0 && lp < 1.0);
        prop_assert!(lm < v && v < lp);
        prop_assert!(eos.max_wave_speed(&p) < 1.0);
    }

    #[test]
    fn primitive_round_trip(p in primitive()) {
        let eos = eos();
        let u = eos.conserved_from_primitive(&p);
        let q = eos.primitive_from_conserved(&u, p.gas_pressure * 1.7).unwrap();
        let tol = Tolerances { abs: 1e-12, rel: 1e-6 };

        prop_assert!(nearly_equal(q.mass_density, p.mass_density, tol));
        prop_assert!(nearly_equal(q.gamma_beta, p.gamma_beta, tol));
        prop_assert!(nearly_equal(q.gas_pressure, p.gas_pressure, tol));
        prop_assert!(nearly_equal(q.scalar, p.scalar, tol));

        // Recovering again from the recovered state changes nothing further.
        let v = eos.conserved_from_primitive(&q);
        let w = eos.primitive_from_conserved(&v, q.gas_pressure).unwrap();
        prop_assert!(nearly_equal(w.gas_pressure, q.gas_pressure, tol));
        prop_assert!(nearly_equal(w.gamma_beta, q.gamma_beta, tol));
    }

    #[test]
    fn plm_uniform_state_is_preserved(p in primitive(), theta in 1.0_f64..=2.0) {
        let plm = Plm::new(theta).unwrap();
        let (fl, fr) = plm.reconstruct(&p, &p, &p);
        prop_assert_eq!(fl, p);
        prop_assert_eq!(fr, p);
    }

    #[test]
    fn plm_faces_stay_within_stencil(
        a in -5.0_f64..5.0,
        b in -5.0_f64..5.0,
        c in -5.0_f64..5.0,
        theta in 1.0_f64..=2.0,
    ) {
        let plm = Plm::new(theta).unwrap();
        let zl = Primitive::new(a, a, a, a);
        let zc = Primitive::new(b, b, b, b);
        let zr = Primitive::new(c, c, c, c);
        let (fl, fr) = plm.reconstruct(&zl, &zc, &zr);
        let lo = a.min(b).min(c) - 1e-12;
        let hi = a.max(b).max(c) + 1e-12;
        for v in [fl.mass_density, fr.mass_density, fl.gas_pressure, fr.scalar] {
            prop_assert!(v >= lo && v <= hi);
        }
    }
}
