use std::panic::Location;

// Copyright 2021 Drift Labs
// Copyright 2025 INSTADAPP LABS INC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Portions of this code are derived from Drift Protocol
// Original source: https://github.com/drift-labs/protocol-v2/blob/master/programs/drift/src/math/safe_math.rs
// Modified by INSTADAPP LABS INC

use crate::errors::{LibraryError, LibraryResult};

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self) -> LibraryResult<Self>;
    fn safe_sub(self, rhs: Self) -> LibraryResult<Self>;
    fn safe_mul(self, rhs: Self) -> LibraryResult<Self>;
    fn safe_div(self, rhs: Self) -> LibraryResult<Self>;
}

#[track_caller]
fn math_error(op: &str) -> LibraryError {
    let caller = Location::caller();
    tracing::error!(
        "Math error ({}) thrown at {}:{}",
        op,
        caller.file(),
        caller.line()
    );
    LibraryError::MathOverflow
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t) -> LibraryResult<$t> {
                self.checked_add(v).ok_or_else(|| math_error("add"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t) -> LibraryResult<$t> {
                self.checked_sub(v).ok_or_else(|| math_error("sub"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t) -> LibraryResult<$t> {
                self.checked_mul(v).ok_or_else(|| math_error("mul"))
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t) -> LibraryResult<$t> {
                if v == 0 {
                    return Err(LibraryError::DivisionByZero(stringify!($t)));
                }
                self.checked_div(v).ok_or_else(|| math_error("div"))
            }
        }
    };
}

checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);
checked_impl!(u16);
checked_impl!(u8);
checked_impl!(i128);
checked_impl!(i64);
checked_impl!(i32);
checked_impl!(i16);
checked_impl!(i8);
