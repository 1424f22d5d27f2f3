//! Integer utilities backing the `/bfhl` operations.

use thiserror::Error;

/// Number of Fibonacci terms whose values all fit in a `u64` (F(0)..=F(93)).
pub const MAX_FIBONACCI_TERMS: u64 = 94;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("{0} requires at least one number")]
    EmptyInput(&'static str),

    #[error("{0} result does not fit in a 64-bit integer")]
    Overflow(&'static str),

    #[error("{operation} input too large (maximum {max})")]
    TooLarge { operation: &'static str, max: u64 },
}

pub type MathResult<T> = Result<T, MathError>;

/// First `n` Fibonacci numbers, starting `0, 1, 1, 2, ...`.
pub fn fibonacci(n: u64) -> MathResult<Vec<u64>> {
    if n > MAX_FIBONACCI_TERMS {
        return Err(MathError::TooLarge {
            operation: "fibonacci",
            max: MAX_FIBONACCI_TERMS,
        });
    }

    let n = n as usize;
    let mut seq: Vec<u64> = Vec::with_capacity(n);
    for i in 0..n {
        let value = match i {
            0 => 0,
            1 => 1,
            _ => seq[i - 1]
                .checked_add(seq[i - 2])
                .ok_or(MathError::Overflow("fibonacci"))?,
        };
        seq.push(value);
    }

    Ok(seq)
}

/// Witness bases that make Miller-Rabin exact for every `u64`.
const MILLER_RABIN_BASES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut result = 1;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    result
}

/// Deterministic Miller-Rabin, a few dozen modular multiplications per call.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    let n = n as u64;
    for p in MILLER_RABIN_BASES {
        if n % p == 0 {
            return n == p;
        }
    }

    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    'witness: for a in MILLER_RABIN_BASES {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm_pair(a: u64, b: u64) -> MathResult<u64> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .ok_or(MathError::Overflow("lcm"))
}

/// Highest common factor of all values, reduced over their magnitudes.
pub fn hcf(values: &[i64]) -> MathResult<u64> {
    let (first, rest) = values.split_first().ok_or(MathError::EmptyInput("hcf"))?;
    Ok(rest
        .iter()
        .fold(first.unsigned_abs(), |acc, v| gcd(acc, v.unsigned_abs())))
}

/// Least common multiple of all values, reduced over their magnitudes.
pub fn lcm(values: &[i64]) -> MathResult<u64> {
    let (first, rest) = values.split_first().ok_or(MathError::EmptyInput("lcm"))?;
    rest.iter()
        .try_fold(first.unsigned_abs(), |acc, v| lcm_pair(acc, v.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_small() {
        assert_eq!(fibonacci(0).unwrap(), Vec::<u64>::new());
        assert_eq!(fibonacci(1).unwrap(), vec![0]);
        assert_eq!(fibonacci(2).unwrap(), vec![0, 1]);
        assert_eq!(fibonacci(5).unwrap(), vec![0, 1, 1, 2, 3]);
        assert_eq!(fibonacci(10).unwrap(), vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
    }

    #[test]
    fn test_fibonacci_largest_fitting_sequence() {
        let seq = fibonacci(MAX_FIBONACCI_TERMS).unwrap();
        assert_eq!(seq.len(), 94);
        assert_eq!(*seq.last().unwrap(), 12_200_160_415_121_876_738);
    }

    #[test]
    fn test_fibonacci_too_large() {
        assert_eq!(
            fibonacci(95),
            Err(MathError::TooLarge {
                operation: "fibonacci",
                max: 94
            })
        );
        assert!(fibonacci(u64::MAX).is_err());
    }

    #[test]
    fn test_is_prime() {
        for p in [2, 3, 5, 7, 11, 13, 97, 7919] {
            assert!(is_prime(p), "{p} should be prime");
        }
        for c in [i64::MIN, -7, 0, 1, 4, 9, 15, 25, 49, 7917] {
            assert!(!is_prime(c), "{c} should not be prime");
        }
    }

    #[test]
    fn test_is_prime_large_values() {
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(1_000_000_007 * 3));
        assert!(!is_prime(i64::MAX));
        // largest prime below 2^63
        assert!(is_prime(9_223_372_036_854_775_783));
        // 2^61 - 1 is a Mersenne prime
        assert!(is_prime(2_305_843_009_213_693_951));
        // strong pseudoprime to bases 2 and 3
        assert!(!is_prime(1_373_653));
        // Carmichael number
        assert!(!is_prime(561));
        // product of two large primes
        assert!(!is_prime(1_000_000_007 * 998_244_353));
    }

    #[test]
    fn test_is_prime_matches_trial_division() {
        fn by_trial_division(n: i64) -> bool {
            n > 1 && (2..).take_while(|i| i * i <= n).all(|i| n % i != 0)
        }
        for n in -5..10_000 {
            assert_eq!(is_prime(n), by_trial_division(n), "{n}");
        }
    }

    #[test]
    fn test_is_prime_large_batch_is_fast() {
        let started = std::time::Instant::now();
        let primes = (0..10_000).filter(|i| is_prime(i64::MAX - i)).count();
        assert!(primes > 0);
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(18, 12), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(0, 0), 0);
    }

    #[test]
    fn test_hcf() {
        assert_eq!(hcf(&[12, 18]).unwrap(), 6);
        assert_eq!(hcf(&[24, 36, 60]).unwrap(), 12);
        assert_eq!(hcf(&[17]).unwrap(), 17);
        assert_eq!(hcf(&[-12, 18]).unwrap(), 6);
        assert_eq!(hcf(&[0, 0]).unwrap(), 0);
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(&[4, 6]).unwrap(), 12);
        assert_eq!(lcm(&[2, 3, 4]).unwrap(), 12);
        assert_eq!(lcm(&[5]).unwrap(), 5);
        assert_eq!(lcm(&[-4, 6]).unwrap(), 12);
        assert_eq!(lcm(&[0, 6]).unwrap(), 0);
    }

    #[test]
    fn test_empty_reductions_are_errors() {
        assert_eq!(hcf(&[]), Err(MathError::EmptyInput("hcf")));
        assert_eq!(lcm(&[]), Err(MathError::EmptyInput("lcm")));
    }

    #[test]
    fn test_lcm_overflow() {
        let err = lcm(&[i64::MAX, i64::MAX - 1]).unwrap_err();
        assert_eq!(err, MathError::Overflow("lcm"));
        assert_eq!(err.to_string(), "lcm result does not fit in a 64-bit integer");
    }

    #[test]
    fn test_i64_min_magnitude() {
        assert_eq!(hcf(&[i64::MIN]).unwrap(), 1u64 << 63);
    }
}
