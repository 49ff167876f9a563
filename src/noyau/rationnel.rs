// src/noyau/rationnel.rs
//
// Reconnaissance des formes “jolies” d’un flottant (mode Exact) :
// - rationnel simple p/q (petit dénominateur, égalité à la tolérance près)
// - racine simple ±k√m/d (v² rationnel simple)
// - sinon meilleure approximation p/q à dénominateur borné
//
// L’approximation part de la valeur binaire EXACTE du flottant
// (BigRational::from_float), puis réduites de fraction continue.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Dénominateur maximal d’un rationnel “simple” (1/3, 5/8, 7/1000…).
pub const DENOMINATEUR_SIMPLE: i64 = 1000;

/// Dénominateur maximal de la meilleure approximation (dernier recours).
pub const DENOMINATEUR_MAX: i64 = 1_000_000;

/// Tolérance relative pour reconnaître un rationnel / une racine.
pub const TOLERANCE: f64 = 1e-12;

/// Meilleure approximation de `x` à dénominateur ≤ `max_den`.
/// Réduites de la fraction continue + meilleure semi-réduite.
pub fn limiter_denominateur(x: &BigRational, max_den: &BigInt) -> BigRational {
    if x.denom() <= max_den {
        return x.clone();
    }

    // on travaille sur |x| (division entière = plancher)
    let negatif = x.is_negative();
    let xa = x.abs();

    let (mut p0, mut q0, mut p1, mut q1) = (
        BigInt::zero(),
        BigInt::one(),
        BigInt::one(),
        BigInt::zero(),
    );
    let mut n = xa.numer().clone();
    let mut d = xa.denom().clone();

    loop {
        let a = &n / &d;
        let q2 = &q0 + &a * &q1;
        if &q2 > max_den {
            break;
        }
        let p2 = &p0 + &a * &p1;
        p0 = std::mem::replace(&mut p1, p2);
        q0 = std::mem::replace(&mut q1, q2);

        let reste = &n - &a * &d;
        n = std::mem::replace(&mut d, reste);
        if d.is_zero() {
            break;
        }
    }

    let k = (max_den - &q0) / &q1;
    let borne1 = BigRational::new(&p0 + &k * &p1, &q0 + &k * &q1);
    let borne2 = BigRational::new(p1, q1);

    let meilleure = if (&borne2 - &xa).abs() <= (&borne1 - &xa).abs() {
        borne2
    } else {
        borne1
    };

    if negatif {
        -meilleure
    } else {
        meilleure
    }
}

/// Meilleure approximation d’un flottant, dénominateur ≤ `max_den`.
/// None si `v` n’est pas fini.
pub fn approximer(v: f64, max_den: i64) -> Option<BigRational> {
    let exact = BigRational::from_float(v)?;
    Some(limiter_denominateur(&exact, &BigInt::from(max_den)))
}

/// `v` est-il un rationnel simple ? Renvoie (p, q) réduit, q > 0.
pub fn rationnel_simple(v: f64) -> Option<(i64, i64)> {
    let r = approximer(v, DENOMINATEUR_SIMPLE)?;
    let p = r.numer().to_i64()?;
    let q = r.denom().to_i64()?;
    let ecart = (p as f64 / q as f64 - v).abs();
    if ecart <= TOLERANCE * v.abs().max(1.0) {
        Some((p, q))
    } else {
        None
    }
}

/// Racine “jolie” : v = signe · k·√m / d  (m > 1 sans facteur carré).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Radical {
    /// coefficient k/d (signé, réduit)
    pub num: i64,
    pub den: i64,
    pub m: i64,
}

/// Détecte v = ±√(p/q) avec p/q rationnel simple qui n’est pas un carré.
pub fn radical_simple(v: f64) -> Option<Radical> {
    if v == 0.0 || !v.is_finite() || v.abs() > 1e4 {
        return None;
    }
    let (p, q) = rationnel_simple(v * v)?;
    if p <= 0 {
        return None;
    }

    // √(p/q) = √(p·q) / q, puis √(p·q) = k√m
    let pq = (p as i128) * (q as i128);
    let (k, m) = extraire_carres(pq)?;
    if m == 1 {
        // carré parfait : v serait rationnel (déjà reconnu en amont)
        return None;
    }

    let g = pgcd(k, q as i128);
    let signe: i128 = if v < 0.0 { -1 } else { 1 };
    Some(Radical {
        num: i64::try_from(signe * k / g).ok()?,
        den: i64::try_from(q as i128 / g).ok()?,
        m: i64::try_from(m).ok()?,
    })
}

/// n = k²·m avec m sans facteur carré. None si n ≤ 0.
pub fn extraire_carres(n: i128) -> Option<(i128, i128)> {
    if n <= 0 {
        return None;
    }
    let mut k: i128 = 1;
    let mut m = n;
    let mut f: i128 = 2;
    while f * f <= m {
        while m % (f * f) == 0 {
            m /= f * f;
            k *= f;
        }
        f += 1;
    }
    Some((k, m))
}

fn pgcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}
