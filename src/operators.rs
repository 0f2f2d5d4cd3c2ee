use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Rem, Sub};

use crate::ops::{BinaryOp, UnaryOp};
use crate::{Again, Die, Result};

macro_rules! impl_die_binary {
    ($($trait:ident, $method:ident, $op:expr);* $(;)?) => {
        $(
            impl<R> $trait<R> for Die
            where
                R: Into<Die>,
            {
                type Output = Result<Die>;

                fn $method(self, rhs: R) -> Self::Output {
                    self.binary($op, rhs)
                }
            }

            impl<R> $trait<R> for &Die
            where
                R: Into<Die>,
            {
                type Output = Result<Die>;

                fn $method(self, rhs: R) -> Self::Output {
                    self.binary($op, rhs)
                }
            }
        )*
    };
}

impl_die_binary!(
    Add, add, BinaryOp::Add;
    Sub, sub, BinaryOp::Sub;
    Mul, mul, BinaryOp::Mul;
    Div, div, BinaryOp::Div;
    Rem, rem, BinaryOp::Mod;
    BitAnd, bitand, BinaryOp::And;
    BitOr, bitor, BinaryOp::Or;
    BitXor, bitxor, BinaryOp::Xor;
);

impl Neg for Die {
    type Output = Result<Die>;

    fn neg(self) -> Self::Output {
        self.unary(UnaryOp::Neg)
    }
}

impl Neg for &Die {
    type Output = Result<Die>;

    fn neg(self) -> Self::Output {
        self.unary(UnaryOp::Neg)
    }
}

macro_rules! impl_again_binary {
    ($($trait:ident, $method:ident, $op:expr);* $(;)?) => {
        $(
            impl<R> $trait<R> for Again
            where
                R: Into<Die>,
            {
                type Output = Again;

                fn $method(self, rhs: R) -> Self::Output {
                    self.binary($op, rhs)
                }
            }
        )*
    };
}

impl_again_binary!(
    Add, add, BinaryOp::Add;
    Sub, sub, BinaryOp::Sub;
    Mul, mul, BinaryOp::Mul;
);

impl Neg for Again {
    type Output = Again;

    fn neg(self) -> Self::Output {
        self.unary(UnaryOp::Neg)
    }
}
